//! Mail transports: IMAP retrieval and SMTP dispatch.

pub mod decoders;
pub mod imap_source;
pub mod smtp;

pub use imap_source::ImapMailbox;
pub use smtp::SmtpDispatcher;
