pub mod lifecycle;
pub mod mailer;
pub mod pin;
pub mod recovery;
