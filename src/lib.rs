pub mod cmd;
pub mod config;
pub mod error;
pub mod key;
pub mod signer;

pub use cmd::{Cmd, SignCmd, USAGE};
pub use error::{Error, KeyfileError, SignError};
pub use key::KeyRecord;
pub use signer::{SignRequest, Signature, Signer};
