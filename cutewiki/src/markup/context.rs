//! Everything one render needs besides the page and the output

use super::block::BlankLines;
use crate::history::RevisionLog;
use crate::store::PageStore;
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

const TIME_FORMAT: &str = "%A,  %d. %b. %Y,  %k:%M";
const DATE_FORMAT: &str = "%A, %d. %b. %Y";

/// Facts about the running wiki shown by directives
#[derive(Debug, Clone)]
pub struct SystemFacts {
    pub wiki_name: String,
    pub host: String,
    pub port: u16,
    pub os_name: String,
    pub os_release: String,
    pub machine: String,
    pub started: DateTime<FixedOffset>,
    pub now: DateTime<FixedOffset>,
    /// Requests served since start
    pub calls: u64,
}

impl SystemFacts {
    /// Facts for a wiki started right now on this machine
    pub fn detect(wiki_name: &str, host: &str, port: u16) -> Self {
        let now = Local::now().fixed_offset();
        let os_release = std::fs::read_to_string("/proc/sys/kernel/osrelease")
            .map(|release| release.trim().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            wiki_name: wiki_name.to_string(),
            host: host.to_string(),
            port,
            os_name: std::env::consts::OS.to_string(),
            os_release,
            machine: std::env::consts::ARCH.to_string(),
            started: now,
            now,
            calls: 1,
        }
    }

    /// `http://host:port`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// An epoch in the wiki's time zone
    pub fn local(&self, epoch: i64) -> DateTime<FixedOffset> {
        self.now
            .offset()
            .timestamp_opt(epoch, 0)
            .single()
            .unwrap_or(self.now)
    }

    /// Date and time of a page change
    pub fn timestring(&self, epoch: i64) -> String {
        self.local(epoch).format(TIME_FORMAT).to_string()
    }

    /// Date of a page change
    pub fn datestring(&self, epoch: i64) -> String {
        self.local(epoch).format(DATE_FORMAT).to_string()
    }

    pub fn actual_date(&self) -> String {
        self.now.format(DATE_FORMAT).to_string()
    }

    pub fn actual_time(&self) -> String {
        self.now.format("%k:%M").to_string()
    }

    pub fn short_date(&self) -> String {
        self.now.format("%y%m%d").to_string()
    }

    pub fn wiki_start(&self) -> String {
        self.started.format("%A, %d. %b. %Y, %k:%M").to_string()
    }

    /// Average calls per day, counting the first day as a full one
    pub fn daily_calls(&self) -> u64 {
        let days = (self.now - self.started).num_days().max(0) as u64 + 1;
        self.calls / days
    }
}

/// Per-render state shared by the line walker and the directives
pub struct RenderContext<'a> {
    pub store: &'a dyn PageStore,
    /// Logged in user
    pub user: String,
    /// Request and form variables
    pub vars: BTreeMap<String, String>,
    pub facts: SystemFacts,
    pub image_dir: PathBuf,
    pub admins: Vec<String>,
    pub blank_lines: BlankLines,
    pub history: &'a dyn RevisionLog,
    pub started: Instant,
}

impl<'a> RenderContext<'a> {
    pub fn new(store: &'a dyn PageStore, history: &'a dyn RevisionLog, facts: SystemFacts) -> Self {
        Self {
            store,
            user: String::new(),
            vars: BTreeMap::new(),
            facts,
            image_dir: PathBuf::from("images"),
            admins: Vec::new(),
            blank_lines: BlankLines::default(),
            history,
            started: Instant::now(),
        }
    }

    /// A request variable, if given
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn is_admin(&self) -> bool {
        self.admins.iter().any(|admin| *admin == self.user)
    }

    /// Whether `<image_dir>/<name>.png` exists
    pub fn image_exists(&self, name: &str) -> bool {
        self.image_dir.join(format!("{}.png", name)).is_file()
    }

    /// Seconds since the epoch at render time
    pub fn now(&self) -> i64 {
        self.facts.now.timestamp()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::history::NoHistory;

    /// Fixed facts: Friday, 1 March 2024, 12:00 at UTC+1
    pub fn facts() -> SystemFacts {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let now = offset.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        SystemFacts {
            wiki_name: "TestWiki".to_string(),
            host: "localhost".to_string(),
            port: 8080,
            os_name: "linux".to_string(),
            os_release: "6.1".to_string(),
            machine: "x86_64".to_string(),
            started: offset.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap(),
            now,
            calls: 30,
        }
    }

    pub fn context<'a>(store: &'a dyn PageStore, history: &'a NoHistory) -> RenderContext<'a> {
        let mut ctx = RenderContext::new(store, history, facts());
        ctx.user = "JohnDoe".to_string();
        ctx.admins = vec!["WikiAdmin".to_string()];
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::testing::facts;

    #[test]
    fn test_date_formats() {
        let facts = facts();
        let epoch = facts.now.timestamp();

        assert_eq!(facts.timestring(epoch), "Friday,  01. Mar. 2024,  12:00");
        assert_eq!(facts.datestring(epoch), "Friday, 01. Mar. 2024");
        assert_eq!(facts.actual_time(), "12:00");
        assert_eq!(facts.short_date(), "240301");
        assert_eq!(facts.wiki_start(), "Wednesday, 28. Feb. 2024, 12:00");
    }

    #[test]
    fn test_daily_calls() {
        // Two full days since start, so three days counted
        assert_eq!(facts().daily_calls(), 10);
    }

    #[test]
    fn test_base_url() {
        assert_eq!(facts().base_url(), "http://localhost:8080");
    }
}
