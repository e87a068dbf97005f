//! CSV export of the finished dataset.
//!
//! RULE: a run either replaces both tables or leaves the directory as
//! it found it. Tables are written to temporary files next to their
//! targets. Tables from an earlier run are moved aside before the new
//! ones are renamed into place, and moved back if that fails.

use crate::{
    error::GenResult,
    pipeline::Dataset,
    profile::ClientProfile,
    transaction_generator::TransactionRecord,
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub const CLIENT_COLUMNS: [&str; 12] = [
    "id",
    "sector",
    "opened_on",
    "balance",
    "revenue",
    "reference_date",
    "age_years",
    "lifecycle_stage",
    "total_received",
    "max_single_payer_received",
    "revenue_concentration",
    "dependency_tier",
];

pub const TRANSACTION_COLUMNS: [&str; 5] = ["payer_id", "payee_id", "amount", "type", "occurred_on"];

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub clients_file: String,
    pub transactions_file: String,
    /// Prefix each file with a UTF-8 byte-order mark so spreadsheet
    /// tools detect the encoding.
    pub utf8_bom: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            clients_file: "clients.csv".into(),
            transactions_file: "transactions.csv".into(),
            utf8_bom: true,
        }
    }
}

/// Paths of the files a successful [`write_dataset`] produced.
#[derive(Debug, Clone)]
pub struct WrittenFiles {
    pub clients: PathBuf,
    pub transactions: PathBuf,
}

pub fn write_clients<W: Write>(writer: W, clients: &[ClientProfile]) -> GenResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CLIENT_COLUMNS)?;
    for p in clients {
        let c = &p.client;
        wtr.write_record(&[
            c.id.to_string(),
            c.sector.clone(),
            c.opened_on.format(DATE_FORMAT).to_string(),
            c.balance.to_string(),
            c.revenue.to_string(),
            c.reference_date.format(DATE_FORMAT).to_string(),
            p.age_years.to_string(),
            p.lifecycle_stage.label().to_string(),
            p.total_received.to_string(),
            p.max_single_payer_received.to_string(),
            p.revenue_concentration.to_string(),
            p.dependency_tier.label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_transactions<W: Write>(writer: W, transactions: &[TransactionRecord]) -> GenResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TRANSACTION_COLUMNS)?;
    for t in transactions {
        wtr.write_record(&[
            t.payer_id.to_string(),
            t.payee_id.to_string(),
            t.amount.to_string(),
            t.kind.clone(),
            t.occurred_on.format(DATE_FORMAT).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write both tables into `dir` (created if missing).
pub fn write_dataset(dir: &Path, dataset: &Dataset, options: &OutputOptions) -> GenResult<WrittenFiles> {
    fs::create_dir_all(dir)?;

    let clients_path = dir.join(&options.clients_file);
    let transactions_path = dir.join(&options.transactions_file);
    let clients_tmp = temp_path(&clients_path);
    let transactions_tmp = temp_path(&transactions_path);

    let staged = write_file(&clients_tmp, options.utf8_bom, |f| write_clients(f, &dataset.clients))
        .and_then(|_| {
            write_file(&transactions_tmp, options.utf8_bom, |f| {
                write_transactions(f, &dataset.transactions)
            })
        });

    if let Err(e) = staged {
        discard(&[clients_tmp.as_path(), transactions_tmp.as_path()]);
        return Err(e);
    }

    let clients_backup = backup_path(&clients_path);
    let transactions_backup = backup_path(&transactions_path);
    let targets = [
        (clients_tmp.as_path(), clients_path.as_path(), clients_backup.as_path()),
        (transactions_tmp.as_path(), transactions_path.as_path(), transactions_backup.as_path()),
    ];
    if let Err(e) = swap_into_place(&targets) {
        discard(&[clients_tmp.as_path(), transactions_tmp.as_path()]);
        return Err(e);
    }
    discard(&[clients_backup.as_path(), transactions_backup.as_path()]);

    log::info!(
        "output: wrote {} clients to {} and {} transactions to {}",
        dataset.clients.len(),
        clients_path.display(),
        dataset.transactions.len(),
        transactions_path.display()
    );
    Ok(WrittenFiles {
        clients: clients_path,
        transactions: transactions_path,
    })
}

fn write_file<F>(path: &Path, bom: bool, body: F) -> GenResult<()>
where
    F: FnOnce(&mut fs::File) -> GenResult<()>,
{
    let mut file = fs::File::create(path)?;
    if bom {
        file.write_all(UTF8_BOM)?;
    }
    body(&mut file)?;
    file.sync_all()?;
    Ok(())
}

/// Move each existing target to its backup, then each staged file to
/// its target. On failure every completed step is undone.
fn swap_into_place(targets: &[(&Path, &Path, &Path)]) -> GenResult<()> {
    let mut backed_up: Vec<(&Path, &Path)> = Vec::new();
    let mut placed: Vec<&Path> = Vec::new();

    let result = (|| -> GenResult<()> {
        for &(_, target, backup) in targets {
            if target.is_file() {
                fs::rename(target, backup)?;
                backed_up.push((backup, target));
            }
        }
        for &(staged, target, _) in targets {
            fs::rename(staged, target)?;
            placed.push(target);
        }
        Ok(())
    })();

    if result.is_err() {
        discard(&placed);
        for (backup, target) in backed_up {
            if let Err(e) = fs::rename(backup, target) {
                log::warn!("output: could not restore {}: {e}", target.display());
            }
        }
    }
    result
}

fn temp_path(target: &Path) -> PathBuf {
    sibling(target, ".tmp")
}

fn backup_path(target: &Path) -> PathBuf {
    sibling(target, ".bak")
}

fn sibling(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    target.with_file_name(name)
}

fn discard(paths: &[&Path]) {
    for path in paths {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                log::warn!("output: could not remove {}: {e}", path.display());
            }
        }
    }
}
