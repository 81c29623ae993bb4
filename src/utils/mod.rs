pub mod choices;
pub mod crypto;
pub mod files;
pub mod naming;
pub mod time;
pub mod token;
pub mod validation;
