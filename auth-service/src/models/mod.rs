pub mod device;
pub mod namespace;
pub mod private_key;
pub mod user;

pub use device::{Device, DeviceIdentity, DeviceInfo, DeviceUid};
pub use namespace::{Namespace, NamespaceSettings};
pub use private_key::PrivateKey;
pub use user::User;
