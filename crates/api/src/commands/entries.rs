//! Entry management commands

use tally_domain::constants::DEFAULT_RECENT_ENTRIES;
use tally_domain::{
    EntryDetails, EntryEdit, EntryId, EntryListQuery, ManualEntry, Result, TimeEntry, UserId,
};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn create_manual_entry(
    ctx: &AppContext,
    user_id: &UserId,
    input: ManualEntry,
) -> Result<TimeEntry> {
    execute_command("entries::create_manual_entry", ctx.entries.create_manual(user_id, input)).await
}

pub async fn edit_entry(
    ctx: &AppContext,
    user_id: &UserId,
    entry_id: EntryId,
    edit: EntryEdit,
) -> Result<TimeEntry> {
    execute_command("entries::edit_entry", ctx.entries.edit(user_id, entry_id, edit)).await
}

/// Archive or restore several entries; returns how many changed.
pub async fn archive_entries(
    ctx: &AppContext,
    user_id: &UserId,
    ids: &[EntryId],
    archived: bool,
) -> Result<usize> {
    execute_command("entries::archive_entries", ctx.entries.set_archived(user_id, ids, archived))
        .await
}

/// Flip one entry's archive flag; returns the new value.
pub async fn toggle_entry_archive(
    ctx: &AppContext,
    user_id: &UserId,
    entry_id: EntryId,
) -> Result<bool> {
    execute_command("entries::toggle_entry_archive", ctx.entries.toggle_archive(user_id, entry_id))
        .await
}

pub async fn list_entries(
    ctx: &AppContext,
    user_id: &UserId,
    query: EntryListQuery,
) -> Result<Vec<TimeEntry>> {
    execute_command("entries::list_entries", ctx.entries.list(user_id, query)).await
}

pub async fn entry_details(
    ctx: &AppContext,
    user_id: &UserId,
    entry_id: EntryId,
) -> Result<EntryDetails> {
    execute_command("entries::entry_details", ctx.entries.details(user_id, entry_id)).await
}

/// Latest closed entries, newest first.
pub async fn recent_entries(
    ctx: &AppContext,
    user_id: &UserId,
    limit: Option<usize>,
) -> Result<Vec<TimeEntry>> {
    let limit = limit.unwrap_or(DEFAULT_RECENT_ENTRIES);
    execute_command("entries::recent_entries", ctx.entries.recent(user_id, limit)).await
}
