// Results persistence: record construction, pass/fail verdict, spreadsheet webhook.

pub mod record;
pub mod webhook;
