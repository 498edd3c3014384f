use crate::config::Config;
use crate::core::boundary::CandidateSource;
use crate::core::message::CandidateMessage;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use log::info;
use native_tls::{TlsConnector, TlsStream};
use std::collections::HashMap;
use std::net::TcpStream;

type ImapSession = imap::Session<TlsStream<TcpStream>>;

/// Candidate source backed by an IMAP folder over TLS.
pub struct ImapMailbox {
    session: ImapSession,
    folder: String,
}

impl ImapMailbox {
    /// Connect, log in with the configured account and select the folder.
    pub fn connect(cfg: &Config) -> AppResult<Self> {
        let host = cfg.imap.host.as_str();
        let user = cfg.user()?;
        let password = cfg.password()?;

        info!("connecting to {host}:{}", cfg.imap.port);
        let tls = TlsConnector::builder()
            .build()
            .map_err(|e| AppError::Mailbox(format!("TLS setup failed: {e}")))?;
        let client = imap::connect((host, cfg.imap.port), host, &tls)?;

        let mut session = client.login(user, password).map_err(|(e, _client)| {
            AppError::Mailbox(format!("login failed for {user}: {e}"))
        })?;

        let mailbox = session.select(&cfg.imap.folder)?;
        info!("{} holds {} message(s)", cfg.imap.folder, mailbox.exists);

        Ok(Self {
            session,
            folder: cfg.imap.folder.clone(),
        })
    }

    pub fn logout(mut self) {
        if let Err(e) = self.session.logout() {
            log::warn!("IMAP logout failed: {e}");
        }
    }
}

/// IMAP `SINCE` argument, e.g. `16-Oct-2026`.
pub fn imap_since(date: NaiveDate) -> String {
    format!("SINCE {}", date.format("%d-%b-%Y"))
}

impl CandidateSource for ImapMailbox {
    fn fetch_since(&mut self, since: NaiveDate) -> AppResult<Vec<CandidateMessage>> {
        let mut uids: Vec<u32> = self.session.uid_search(imap_since(since))?.into_iter().collect();
        uids.sort_unstable();

        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let uid_set = uids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let fetches = self.session.uid_fetch(&uid_set, "(UID INTERNALDATE)")?;

        let dates: HashMap<u32, NaiveDate> = fetches
            .iter()
            .filter_map(|f| Some((f.uid?, f.internal_date()?.date_naive())))
            .collect();

        info!("{} message(s) in {} since {since}", uids.len(), self.folder);

        Ok(uids
            .into_iter()
            .map(|uid| CandidateMessage {
                uid,
                received_on: dates.get(&uid).copied(),
            })
            .collect())
    }

    fn materialize(&mut self, candidate: &CandidateMessage) -> AppResult<Vec<u8>> {
        let fetches = self
            .session
            .uid_fetch(candidate.uid.to_string(), "(UID BODY.PEEK[])")?;

        fetches
            .iter()
            .find_map(|f| f.body().map(<[u8]>::to_vec))
            .ok_or_else(|| AppError::Mailbox(format!("UID {} has no body", candidate.uid)))
    }
}
