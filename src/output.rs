use crate::domain::model::StatusRecord;
use crate::utils::error::{Result, StatusError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(StatusError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credit = &self.credit;
        let tariff = &self.tariff;

        writeln!(f, "Credit:    {} Kč", credit.total)?;
        writeln!(
            f,
            "  standard {} Kč, expires {}",
            credit.standard.amount, credit.standard.expires
        )?;
        writeln!(
            f,
            "  bonus    {} Kč, expires {}",
            credit.bonus.amount, credit.bonus.expires
        )?;
        writeln!(
            f,
            "Tariff:    {} (auto-renewal: {}, renews {})",
            tariff.tariff_name,
            if tariff.auto_subscription { "yes" } else { "no" },
            tariff.renewal_date
        )?;
        writeln!(f, "  data     {} GB", tariff.gigs_left)?;
        writeln!(
            f,
            "  minutes  {} ({} s)",
            tariff.minutes_left, tariff.seconds_left
        )?;
        write!(f, "  sms      {}", tariff.sms_left)
    }
}

const CSV_HEADER: [&str; 12] = [
    "credit.total",
    "credit.standard.amount",
    "credit.standard.expires",
    "credit.bonus.amount",
    "credit.bonus.expires",
    "tariff.tariffName",
    "tariff.autoSubscription",
    "tariff.renewalDate",
    "tariff.gigsLeft",
    "tariff.minutesLeft",
    "tariff.secondsLeft",
    "tariff.smsLeft",
];

fn render_csv(record: &StatusRecord) -> Result<String> {
    let credit = &record.credit;
    let tariff = &record.tariff;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    writer.write_record([
        credit.total.to_string(),
        credit.standard.amount.to_string(),
        credit.standard.expires.to_string(),
        credit.bonus.amount.to_string(),
        credit.bonus.expires.to_string(),
        tariff.tariff_name.clone(),
        tariff.auto_subscription.to_string(),
        tariff.renewal_date.to_string(),
        tariff.gigs_left.to_string(),
        tariff.minutes_left.to_string(),
        tariff.seconds_left.to_string(),
        tariff.sms_left.to_string(),
    ])?;

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

pub fn render(record: &StatusRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(record.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => render_csv(record),
    }
}
