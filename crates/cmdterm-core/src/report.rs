//! Transcript formatting for built-in results

use crate::config::{EngineConfig, Surface};
use crate::history::HistoryStore;
use crate::monitor::{MonitoringSnapshot, SnapshotSource};
use cmdterm_tools::{DirEntryInfo, EntryKind};
use std::fmt::Write;
use std::path::Path;

/// Width of usage bars in `monitor`
pub const BAR_WIDTH: usize = 50;

const RULE_WIDE: usize = 80;
const RULE_NARROW: usize = 50;
const PROCESS_NAME_WIDTH: usize = 25;

/// `15420` → `"15,420"`
#[must_use]
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A [`BAR_WIDTH`]-column bar, one block per two percent
#[must_use]
pub fn usage_bar(percent: f64) -> String {
    let filled = ((percent / 2.0).max(0.0) as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

/// `ls` table, directories first then case-insensitive name
#[must_use]
pub fn listing(dir: &Path, mut entries: Vec<DirEntryInfo>, simulated: bool) -> String {
    if entries.is_empty() {
        return "📁 Directory is empty".to_string();
    }
    entries.sort_by_cached_key(|e| (e.kind, e.name.to_lowercase()));

    let mut out = String::new();
    let suffix = if simulated { " (simulated)" } else { "" };
    let _ = writeln!(out, "\n📁 Contents of {}{}:", dir.display(), suffix);
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDE));
    let _ = writeln!(out, "{:<35} {:<12} {:<15} {:<18}", "Name", "Type", "Size", "Modified");
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDE));

    for entry in &entries {
        let (icon, size) = match entry.kind {
            EntryKind::Directory => ("📁", String::new()),
            EntryKind::File => ("📄", format!("{} bytes", thousands(entry.size_bytes))),
        };
        let modified = entry
            .modified_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{} {:<32} {:<12} {:<15} {:<18}",
            icon,
            entry.name,
            entry.kind.as_str(),
            size,
            modified
        );
    }
    out
}

/// `monitor` report
#[must_use]
pub fn snapshot(snapshot: &MonitoringSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n🖥️  SYSTEM MONITORING");
    let _ = writeln!(out, "{}", "=".repeat(RULE_NARROW));

    if let SnapshotSource::Fallback { reason } = &snapshot.source {
        let _ = writeln!(out, "⚠️  Monitoring unavailable: {}", reason);
        let _ = writeln!(out, "   Figures below are placeholders.\n");
    }

    let _ = writeln!(out, "🔥 CPU Usage: {:.1}%", snapshot.cpu_percent);
    let _ = writeln!(out, "{}\n", usage_bar(snapshot.cpu_percent));

    let memory = &snapshot.memory;
    let _ = writeln!(out, "💾 Memory Usage: {:.1}%", memory.percent);
    let _ = writeln!(out, "   Total: {:.1} GB", memory.total_gb);
    let _ = writeln!(out, "   Used:  {:.1} GB", memory.used_gb);
    let _ = writeln!(out, "   Free:  {:.1} GB", memory.available_gb);
    let _ = writeln!(out, "{}\n", usage_bar(memory.percent));

    let disk = &snapshot.disk;
    let _ = writeln!(out, "💿 Disk Usage: {:.1}%", disk.percent);
    let _ = writeln!(out, "   Total: {:.1} GB", disk.total_gb);
    let _ = writeln!(out, "   Used:  {:.1} GB", disk.used_gb);
    let _ = writeln!(out, "   Free:  {:.1} GB", disk.free_gb);
    let _ = writeln!(out, "{}\n", usage_bar(disk.percent));

    let _ = writeln!(out, "🚀 Top Processes (by CPU):");
    let _ = writeln!(out, "{}", "-".repeat(RULE_NARROW));
    if snapshot.top_processes.is_empty() {
        let _ = writeln!(out, "   (no process data)");
    }
    for (i, process) in snapshot.top_processes.iter().enumerate() {
        let name: String = if process.name.is_empty() {
            "Unknown".to_string()
        } else {
            process.name.chars().take(PROCESS_NAME_WIDTH).collect()
        };
        let _ = writeln!(
            out,
            "{}. {:<25} CPU: {:5.1}% | MEM: {:5.1}%",
            i + 1,
            name,
            process.cpu_percent.unwrap_or(0.0),
            process.memory_percent.unwrap_or(0.0)
        );
    }
    out
}

/// `history` report for the most recent `count` entries
#[must_use]
pub fn history(store: &HistoryStore, count: usize) -> String {
    if store.is_empty() {
        return "📚 No command history".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "\n📚 COMMAND HISTORY:");
    let _ = writeln!(out, "{}", "─".repeat(RULE_NARROW));
    for (i, entry) in store.recent(count).enumerate() {
        let _ = writeln!(out, "{:2}. {} - {}", i + 1, entry.timestamp, entry.command);
    }
    out
}

/// `help` text for the active configuration
#[must_use]
pub fn help(config: &EngineConfig) -> String {
    let simulated = config.is_simulated();
    let rule = "─".repeat(45);
    let mut out = String::new();

    let _ = writeln!(out, "\n📋 AVAILABLE COMMANDS:\n{}", rule);
    let _ = writeln!(out, "📍 pwd                    - Show current directory");
    let _ = writeln!(out, "📁 cd <directory>         - Change directory");
    if simulated {
        let _ = writeln!(out, "📄 ls/dir [directory]     - List directory contents (demo)");
        let _ = writeln!(out, "📁 mkdir <name>           - Create directory (simulated)");
        let _ = writeln!(out, "🗑️  rm/del <name>          - Remove item (simulated)");
    } else {
        let _ = writeln!(out, "📄 ls/dir [directory]     - List directory contents");
        let _ = writeln!(out, "📁 mkdir <name>           - Create directory");
        let _ = writeln!(out, "🗑️  rm/del <name>          - Remove file or directory");
    }
    let _ = writeln!(out, "🖥️  monitor/system        - Show system monitoring info");
    let _ = writeln!(out, "📋 help                   - Show this help message");
    let _ = writeln!(out, "🧹 clear                  - Clear terminal");
    let _ = writeln!(out, "📚 history                - Show command history");
    if config.extras {
        let _ = writeln!(out, "🔊 echo <text>            - Print text");
        let _ = writeln!(out, "📅 date                   - Show current date and time");
        let _ = writeln!(out, "👤 whoami                 - Show current user");
    }
    if config.surface == Surface::Cli {
        let _ = writeln!(out, "🚪 exit/quit              - Exit terminal");
    }

    let _ = writeln!(out, "\n🤖 NATURAL LANGUAGE COMMANDS:\n{}", rule);
    let _ = writeln!(out, "• \"create folder mydir\"   - Creates a directory");
    let _ = writeln!(out, "• \"list files\"            - Lists current directory");
    let _ = writeln!(out, "• \"go to documents\"       - Changes to documents folder");
    if !simulated {
        let _ = writeln!(out, "• \"move file a.txt to b\"  - Moves a file");
    }
    let _ = writeln!(out, "• \"show system info\"      - Displays system monitoring");

    let _ = writeln!(out, "\n💡 OTHER COMMANDS:\n{}", rule);
    if config.allowed_verbs.is_empty() || config.exec_mode == crate::config::ExecMode::Unrestricted {
        let _ = writeln!(out, "• Anything else runs through the system shell");
    } else {
        let verbs: Vec<&str> = config.allowed_verbs.iter().map(String::as_str).collect();
        let _ = writeln!(out, "• Shell commands allowed here: {}", verbs.join(", "));
    }
    if config.surface == Surface::Cli {
        let _ = writeln!(out, "• Use Tab for auto-completion");
        let _ = writeln!(out, "• Use ↑/↓ arrows for command history");
    }
    if simulated {
        let _ = writeln!(out, "\n⚠️  Running in a restricted environment");
        let _ = writeln!(out, "   Directory changes are simulated.");
    }
    out
}
