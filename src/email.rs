//! Summary email rendering and delivery.

use crate::amount::Amount;
use crate::config::MailConfig;
use crate::error::Result;
use crate::summary::AggregateResult;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{FileTransport, Message, Transport};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Values substituted into the summary email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailData {
    pub total_balance: Amount,
    pub average_debit: Amount,
    pub average_credit: Amount,

    /// Transaction count per `YYYY-MM`, ascending.
    pub transactions_by_period: Vec<(String, usize)>,
}

impl From<&AggregateResult> for EmailData {
    fn from(result: &AggregateResult) -> Self {
        EmailData {
            total_balance: result.total_balance,
            average_debit: result.average_debit,
            average_credit: result.average_credit,
            transactions_by_period: result
                .summary_by_period
                .iter()
                .map(|(period, summary)| (period.clone(), summary.transaction_count))
                .collect(),
        }
    }
}

/// Writes the summary as an HTML document.
pub fn write_html<W: Write>(data: &EmailData, mut writer: W) -> Result<()> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(
        writer,
        "<head><meta charset=\"utf-8\"><title>Transaction Summary</title></head>"
    )?;
    writeln!(writer, "<body style=\"font-family: sans-serif;\">")?;
    writeln!(writer, "<h1>Transaction Summary</h1>")?;
    writeln!(writer, "<p>Total balance is {}</p>", data.total_balance)?;
    writeln!(writer, "<ul>")?;
    for (period, count) in &data.transactions_by_period {
        writeln!(
            writer,
            "<li>Number of transactions in {}: {}</li>",
            escape_html(period),
            count
        )?;
    }
    writeln!(writer, "</ul>")?;
    writeln!(writer, "<p>Average debit amount: {}</p>", data.average_debit)?;
    writeln!(writer, "<p>Average credit amount: {}</p>", data.average_credit)?;
    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;

    writer.flush()?;
    Ok(())
}

/// Renders the summary as an HTML string.
pub fn render_html(data: &EmailData) -> Result<String> {
    let mut buffer = Vec::new();
    write_html(data, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A single HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    /// Builds the summary message for `result` addressed per `config`.
    pub fn summary(config: &MailConfig, result: &AggregateResult) -> Result<Self> {
        Ok(EmailMessage {
            from: config.from.clone(),
            to: config.to.clone(),
            subject: config.subject.clone(),
            html_body: render_html(&EmailData::from(result))?,
        })
    }

    /// Builds the MIME message. Header values are encoded by `lettre`.
    pub fn to_message(&self) -> Result<Message> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(self.html_body.clone())?;
        Ok(message)
    }

    /// Formats the message as an RFC 5322 document.
    pub fn to_mime(&self) -> Result<String> {
        let formatted = self.to_message()?.formatted();
        Ok(String::from_utf8_lossy(&formatted).into_owned())
    }
}

/// Delivers email messages.
pub trait Mailer {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Drops messages as `.eml` files into a pickup directory for a local MTA.
pub struct OutboxMailer {
    dir: PathBuf,
    transport: FileTransport,
}

impl OutboxMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        OutboxMailer {
            transport: FileTransport::new(&dir),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let id = self.transport.send(&message.to_message()?)?;
        info!(
            "Queued summary email to {} as {}/{}.eml",
            message.to,
            self.dir.display(),
            id
        );
        Ok(())
    }
}
