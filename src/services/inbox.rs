// src/services/inbox.rs

//! Mailbox reply collection.
//!
//! Fetches unseen replies over IMAP. The protocol client is blocking, so
//! the whole mailbox pass runs on the blocking thread pool. Callers
//! filter the result down to previously-contacted senders.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use mailparse::{MailHeaderMap, ParsedMail};

use crate::error::{AppError, Result};
use crate::models::{MailConfig, MailCredentials, Reply};

/// Upper bound on messages read in one mailbox pass.
const MAX_MESSAGES: usize = 50;

/// IMAP search for replies to the outreach template.
const REPLY_QUERY: &str = "UNSEEN SUBJECT \"Re:\"";

/// Service for fetching unseen replies from the inbox.
pub struct ReplyFetcher {
    config: MailConfig,
    credentials: MailCredentials,
}

impl ReplyFetcher {
    pub fn new(config: MailConfig, credentials: MailCredentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Fetch unseen messages whose subject marks them as replies.
    pub async fn fetch_unseen_replies(&self) -> Result<Vec<Reply>> {
        let config = self.config.clone();
        let credentials = self.credentials.clone();
        tokio::task::spawn_blocking(move || fetch_blocking(&config, &credentials))
            .await
            .map_err(|e| AppError::mail(format!("reply fetch task failed: {e}")))?
    }
}

fn fetch_blocking(config: &MailConfig, credentials: &MailCredentials) -> Result<Vec<Reply>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let address = (config.imap_host.as_str(), config.imap_port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| AppError::mail(format!("cannot resolve {}", config.imap_host)))?;

    let tcp = TcpStream::connect_timeout(&address, timeout)?;
    tcp.set_read_timeout(Some(timeout))?;
    tcp.set_write_timeout(Some(timeout))?;

    let tls = native_tls::TlsConnector::new().map_err(AppError::mail)?;
    let stream = tls
        .connect(&config.imap_host, tcp)
        .map_err(AppError::mail)?;

    let client = imap::Client::new(stream);
    let mut session = client
        .login(&credentials.address, &credentials.password)
        .map_err(|(error, _)| AppError::mail(error))?;

    session.select("INBOX").map_err(AppError::mail)?;
    let mut ids: Vec<u32> = session
        .search(REPLY_QUERY)
        .map_err(AppError::mail)?
        .into_iter()
        .collect();
    ids.sort_unstable();
    log::info!("Found {} candidate replies", ids.len());

    let mut replies = Vec::new();
    for id in ids.into_iter().take(MAX_MESSAGES) {
        let messages = match session.fetch(id.to_string(), "RFC822") {
            Ok(messages) => messages,
            Err(error) => {
                log::warn!("Fetch failed for message {}: {}", id, error);
                continue;
            }
        };
        for message in messages.iter() {
            let Some(raw) = message.body() else { continue };
            if let Some(reply) = parse_reply(raw) {
                replies.push(reply);
            }
        }
    }

    session.logout().ok();
    Ok(replies)
}

/// Parse a raw RFC822 message into a reply record.
fn parse_reply(raw: &[u8]) -> Option<Reply> {
    let parsed = mailparse::parse_mail(raw).ok()?;
    let from = parsed.headers.get_first_value("From")?;
    let subject = parsed.headers.get_first_value("Subject").unwrap_or_default();
    let body = extract_text_body(&parsed).unwrap_or_default();

    Some(Reply {
        from,
        subject,
        body: body.trim().to_string(),
    })
}

/// First text/plain part of a message, walking nested multiparts.
fn extract_text_body(mail: &ParsedMail) -> Option<String> {
    if mail.subparts.is_empty() {
        return mail.get_body().ok();
    }
    for part in &mail.subparts {
        if part.ctype.mimetype == "text/plain" {
            return part.get_body().ok();
        }
    }
    for part in &mail.subparts {
        if let Some(body) = extract_text_body(part) {
            return Some(body);
        }
    }
    None
}
