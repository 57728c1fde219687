//! Contact submission commands.

use nexussphere_site::db::ContactRepository;
use nexussphere_site::db::contacts::PgContactRepository;

use super::{CommandError, connect};

/// Print the newest `limit` submissions.
#[allow(clippy::print_stdout)]
pub async fn list(limit: usize) -> Result<(), CommandError> {
    let pool = connect().await?;
    let contacts = PgContactRepository::new(pool).list_recent(limit).await?;

    if contacts.is_empty() {
        println!("No contact submissions.");
        return Ok(());
    }

    for contact in contacts {
        println!(
            "#{} {} <{}>{} - {}",
            contact.id,
            contact.name,
            contact.email,
            contact
                .company
                .as_deref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default(),
            contact.created_at.format("%Y-%m-%d %H:%M"),
        );
        println!("    {}", contact.message.replace('\n', "\n    "));
    }
    Ok(())
}
