use log::{debug, info};

use crate::{diff::TableDiff, errors::DriftError, models::table::Table};

/// Downstream consumer of drift, e.g. an alerting hook.
#[cfg_attr(test, mockall::automock)]
pub trait DriftReporter {
    fn report(&mut self, table: &str, diff: &TableDiff) -> Result<(), DriftError>;
}

/// Compares `remote` against `desired` and hands any drift to `reporter`.
///
/// Returns whether drift was found.
pub fn check_drift<R>(remote: &Table, desired: &Table, reporter: &mut R) -> Result<bool, DriftError>
where
    R: DriftReporter + ?Sized,
{
    let diff = remote.diff(desired);
    if diff.is_empty() {
        debug!("table {} matches its desired definition", remote.name());
        return Ok(false);
    }

    info!(
        "table {} drifted in {}",
        remote.name(),
        diff.fields().collect::<Vec<_>>().join(", ")
    );
    reporter.report(remote.name(), &diff)?;
    Ok(true)
}

/// Runs [`check_drift`] over every pair, stopping at the first reporter error.
///
/// Returns the names of the drifted tables.
pub fn check_all<'a, I, R>(pairs: I, reporter: &mut R) -> Result<Vec<String>, DriftError>
where
    I: IntoIterator<Item = (&'a Table, &'a Table)>,
    R: DriftReporter + ?Sized,
{
    let mut drifted = Vec::new();
    for (remote, desired) in pairs {
        if check_drift(remote, desired, reporter)? {
            drifted.push(remote.name().to_string());
        }
    }
    Ok(drifted)
}
