//! Emoji used across the CLI output, with plain-text fallbacks for
//! terminals that can't render them.

use console::Emoji;
use taskboard_common::Column;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");
pub static SYNC: Emoji<'_, '_> = Emoji("🔄 ", "[~]");

// Board columns
pub static TODO: Emoji<'_, '_> = Emoji("📋 ", "[ ]");
pub static IN_PROGRESS: Emoji<'_, '_> = Emoji("🚧 ", "[>]");
pub static DONE: Emoji<'_, '_> = Emoji("🏁 ", "[x]");

// Entities
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
pub static STAR: Emoji<'_, '_> = Emoji("⭐ ", "*");
pub static PERSON: Emoji<'_, '_> = Emoji("👤 ", "@");
pub static CALENDAR: Emoji<'_, '_> = Emoji("📅 ", "");
pub static COMMENT: Emoji<'_, '_> = Emoji("💬 ", ">");
pub static BELL: Emoji<'_, '_> = Emoji("🔔 ", "(!)");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

pub fn column_icon(column: Column) -> &'static Emoji<'static, 'static> {
    match column {
        Column::Todo => &TODO,
        Column::Progress => &IN_PROGRESS,
        Column::Done => &DONE,
    }
}
