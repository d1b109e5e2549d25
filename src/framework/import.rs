//! Composite import IDs of the form `<account_id>/<resource_id>`

use super::diag::Diagnostic;
use super::path::Path;
use super::resource::ImportStateResponse;

/// Split a raw import ID into `(account_id, resource_id)`.
///
/// Exactly one `/` is accepted. The parts themselves are not validated, so
/// `"/abc"` yields an empty account ID.
pub fn parse_account_scoped_id<'a>(
    raw: &'a str,
    summary: &str,
    expected: &str,
) -> Result<(&'a str, &'a str), Diagnostic> {
    let parts: Vec<&str> = raw.split('/').collect();
    match parts.as_slice() {
        [account_id, resource_id] => Ok((*account_id, *resource_id)),
        _ => Err(Diagnostic::error(
            summary,
            format!(
                "Invalid ID specified. Please specify the ID as \"{}\"",
                expected
            ),
        )),
    }
}

/// Parse an account-scoped import ID and write `account_id` and `id` into
/// the response state. Nothing is written when the ID is malformed.
pub fn import_account_scoped(
    raw: &str,
    summary: &str,
    expected: &str,
    resp: &mut ImportStateResponse,
) {
    let Some((account_id, resource_id)) = resp
        .diagnostics
        .capture(parse_account_scoped_id(raw, summary, expected))
    else {
        return;
    };

    tracing::info!("Importing {} into account {}", resource_id, account_id);

    let written = resp
        .state
        .set_attribute(&Path::root("account_id"), account_id);
    if resp.diagnostics.capture(written).is_none() {
        return;
    }
    let written = resp.state.set_attribute(&Path::root("id"), resource_id);
    resp.diagnostics.capture(written);
}
