use super::LanguageShare;
use crate::Result;
use crate::collect::Aggregate;
use core::fmt::Write;
use serde_json::json;

pub fn generate<W: Write>(login: &str, aggregate: &Aggregate, shares: &[LanguageShare], writer: &mut W) -> Result<()> {
    let languages: Vec<_> = shares
        .iter()
        .map(|share| {
            json!({
                "name": share.name,
                "color": share.color,
                "size": share.size,
                "percentage": share.percentage,
                "repositories": share.repositories,
            })
        })
        .collect();

    let passes: Vec<_> = aggregate
        .passes()
        .iter()
        .map(|pass| {
            json!({
                "family": pass.family.to_string(),
                "pages": pass.pages,
                "repositories": pass.nodes,
                "folded": pass.folded,
                "skipped_duplicates": pass.skipped_duplicates,
                "stop": pass.stop.to_string(),
            })
        })
        .collect();

    let output = json!({
        "login": login,
        "repositories_found": aggregate.found(),
        "repositories_processed": aggregate.processed(),
        "total_size": aggregate.total_size(),
        "languages": languages,
        "passes": passes,
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}
