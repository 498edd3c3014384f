use crate::errors::{AppError, AppResult};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Runtime configuration, built once at start-up and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub account: AccountConfig,
    pub imap: ImapConfig,
    pub smtp: SmtpConfig,
    pub printer_email: Option<String>,
    pub filter: FilterConfig,
    pub timezone: String,
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub phrase: String,
    pub attachment_ext: String,
    pub sender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start_hour: u32,
    pub end_hour: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub repeat_header: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub body: String,
    pub attachment_name: String,
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            host: "imap.gmail.com".to_string(),
            port: 993,
            folder: "INBOX".to_string(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            phrase: "Daily Lead Report".to_string(),
            attachment_ext: ".xlsx".to_string(),
            sender: None,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 9,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            body: "This email is to be printed.".to_string(),
            attachment_name: "report.pdf".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: AccountConfig::default(),
            imap: ImapConfig::default(),
            smtp: SmtpConfig::default(),
            printer_email: None,
            filter: FilterConfig::default(),
            timezone: "America/New_York".to_string(),
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("email2printer")
    }

    /// Return the full path of the default config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("email2printer.yaml")
    }

    /// Load the configuration: defaults, then the YAML file (if present),
    /// then environment overrides.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(path, &env)
    }

    /// Same as [`Config::load`] with an explicit environment map.
    pub fn load_with_env(path: Option<&Path>, env: &HashMap<String, String>) -> AppResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Self::config_file();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        cfg.apply_env(env);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Environment variables win over the file.
    pub fn apply_env(&mut self, env: &HashMap<String, String>) {
        let get = |key: &str| {
            env.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("GMAIL_USER") {
            self.account.user = Some(v);
        }
        if let Some(v) = get("GMAIL_PASSWORD") {
            self.account.password = Some(v);
        }
        if let Some(v) = get("PRINTER_EMAIL") {
            self.printer_email = Some(v);
        }
        if let Some(v) = get("REPORT_PHRASE") {
            self.filter.phrase = v;
        }
        if let Some(v) = get("REPORT_ATTACHMENT_EXT") {
            self.filter.attachment_ext = v;
        }
        if let Some(v) = get("REPORT_SENDER") {
            self.filter.sender = Some(v);
        }
        if let Some(v) = get("REPORT_TIMEZONE") {
            self.timezone = v;
        }
        if let Some(v) = get("IMAP_HOST") {
            self.imap.host = v;
        }
        if let Some(v) = get("SMTP_HOST") {
            self.smtp.host = v;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        self.tz()?;

        if self.window.start_hour > 23 || self.window.end_hour > 23 {
            return Err(AppError::Config(format!(
                "window hours must be between 0 and 23 (got {} and {})",
                self.window.start_hour, self.window.end_hour
            )));
        }

        if !self.filter.attachment_ext.starts_with('.') {
            return Err(AppError::Config(format!(
                "attachment_ext must start with '.': {}",
                self.filter.attachment_ext
            )));
        }

        if self.filter.phrase.is_empty() {
            return Err(AppError::Config("filter phrase cannot be empty".into()));
        }

        Ok(())
    }

    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn user(&self) -> AppResult<&str> {
        self.account
            .user
            .as_deref()
            .ok_or(AppError::MissingSetting("account.user / GMAIL_USER"))
    }

    pub fn password(&self) -> AppResult<&str> {
        self.account
            .password
            .as_deref()
            .ok_or(AppError::MissingSetting("account.password / GMAIL_PASSWORD"))
    }

    pub fn printer(&self) -> AppResult<&str> {
        self.printer_email
            .as_deref()
            .ok_or(AppError::MissingSetting("printer_email / PRINTER_EMAIL"))
    }

    /// Copy safe to print: the password is masked.
    pub fn redacted(&self) -> Self {
        let mut c = self.clone();
        if c.account.password.is_some() {
            c.account.password = Some("********".to_string());
        }
        c
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Write a template file; never overwrites an existing one.
    pub fn write_template(path: &Path) -> AppResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let yaml = Self::default().to_yaml()?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(true)
    }
}
