pub mod clock;
pub mod password;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use password::{digest_password, verify_password, Password, PasswordDigest};
pub use validation::{validate_attributes, validate_hostname};
