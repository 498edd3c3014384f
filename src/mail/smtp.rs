use crate::config::Config;
use crate::core::boundary::Dispatcher;
use crate::errors::{AppError, AppResult};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;

/// Sends the document as a PDF attachment through an SMTP STARTTLS relay.
pub struct SmtpDispatcher {
    host: String,
    port: u16,
    user: String,
    password: String,
    body: String,
    attachment_name: String,
}

impl SmtpDispatcher {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            host: cfg.smtp.host.clone(),
            port: cfg.smtp.port,
            user: cfg.user()?.to_string(),
            password: cfg.password()?.to_string(),
            body: cfg.mail.body.clone(),
            attachment_name: cfg.mail.attachment_name.clone(),
        })
    }

    /// Message ready for the transport.
    pub fn build_message(&self, document: &[u8], destination: &str, subject: &str) -> AppResult<Message> {
        let from: Mailbox = self
            .user
            .parse()
            .map_err(|e| AppError::Dispatch(format!("sender address is invalid: {e}")))?;
        let to: Mailbox = destination
            .parse()
            .map_err(|e| AppError::Dispatch(format!("destination '{destination}' is invalid: {e}")))?;
        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| AppError::Dispatch(e.to_string()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(self.body.clone()))
                    .singlepart(
                        Attachment::new(self.attachment_name.clone()).body(document.to_vec(), pdf_type),
                    ),
            )
            .map_err(|e| AppError::Dispatch(format!("message build failed: {e}")))
    }
}

impl Dispatcher for SmtpDispatcher {
    fn send(&self, document: &[u8], destination: &str, subject: &str) -> AppResult<()> {
        let message = self.build_message(document, destination, subject)?;

        let transport = SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| AppError::Dispatch(format!("smtp relay init failed: {e}")))?
            .port(self.port)
            .credentials(Credentials::new(self.user.clone(), self.password.clone()))
            .build();

        let response = transport
            .send(&message)
            .map_err(|e| AppError::Dispatch(format!("smtp send to '{destination}' failed: {e}")))?;
        info!("smtp accepted message: {}", response.code());

        Ok(())
    }
}
