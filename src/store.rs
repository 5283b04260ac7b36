//! File-backed customer store.
//!
//! Keeps customers keyed by identifier together with their last persisted
//! order, and writes the ordered set as one line per record:
//!
//! ```text
//! id, name, email, familySize, emergencyLevel, location, notes
//! ```
//!
//! Only `notes`, the last field, may contain the `", "` separator.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::Customer;
use crate::sorter::CustomerSorter;
use crate::validation::{
    validate_customer, validate_customers, ValidationError, ValidationErrorKind,
};

/// Separator between fields of a persisted record.
pub const FIELD_SEPARATOR: &str = ", ";
/// Suffix appended to the file name for the pre-save backup copy.
pub const BACKUP_SUFFIX: &str = ".backup";

const FIELD_COUNT: usize = 7;

/// Encodes a customer as one persisted line (without the newline).
pub fn format_record(customer: &Customer) -> String {
    let family_size = customer.family_size.to_string();
    let emergency_level = customer.emergency_level.to_string();
    [
        customer.id.as_str(),
        customer.name.as_str(),
        customer.email.as_str(),
        family_size.as_str(),
        emergency_level.as_str(),
        customer.location.as_str(),
        customer.notes.as_str(),
    ]
    .join(FIELD_SEPARATOR)
}

/// Decodes one persisted line. `line_no` is 1-based and only used in errors.
pub fn parse_record(line: &str, line_no: usize) -> Result<Customer> {
    let fields: Vec<&str> = line.splitn(FIELD_COUNT, FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        });
    }

    let family_size = fields[3].trim().parse::<u32>().map_err(|e| Error::MalformedRecord {
        line: line_no,
        reason: format!("family size {:?}: {e}", fields[3]),
    })?;
    let emergency_level = fields[4].trim().parse::<i32>().map_err(|e| Error::MalformedRecord {
        line: line_no,
        reason: format!("emergency level {:?}: {e}", fields[4]),
    })?;

    Ok(Customer {
        id: fields[0].to_string(),
        name: fields[1].to_string(),
        email: fields[2].to_string(),
        family_size,
        emergency_level,
        location: fields[5].to_string(),
        notes: fields[6].to_string(),
    })
}

/// Customers keyed by identifier, persisted in service order.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    path: PathBuf,
    records: HashMap<String, Customer>,
    order: Vec<String>,
}

impl CustomerStore {
    /// Loads the store from `path`, or starts empty if the file is absent.
    ///
    /// A later line with an already-seen identifier replaces the earlier one.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::in_memory(path, Vec::new()));
        }

        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let mut customers = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            customers.push(parse_record(line, idx + 1)?);
        }

        info!(path = %path.display(), count = customers.len(), "loaded customer records");
        Ok(Self::in_memory(path, customers))
    }

    /// Builds a store from records already in memory, keeping their order.
    pub fn in_memory(path: impl Into<PathBuf>, customers: Vec<Customer>) -> Self {
        let mut store = Self {
            path: path.into(),
            records: HashMap::with_capacity(customers.len()),
            order: Vec::with_capacity(customers.len()),
        };
        for customer in customers {
            if store.records.contains_key(&customer.id) {
                warn!(id = %customer.id, "duplicate customer ID, keeping the later record");
                store.order.retain(|id| id != &customer.id);
            }
            store.order.push(customer.id.clone());
            store.records.insert(customer.id.clone(), customer);
        }
        store
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup written by [`sort_and_save`](Self::sort_and_save).
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Looks up a customer by identifier.
    pub fn get(&self, id: &str) -> Option<&Customer> {
        self.records.get(id)
    }

    /// Number of stored customers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Customers in their last persisted order.
    pub fn ordered(&self) -> impl Iterator<Item = &Customer> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// 1-based position of a customer in the persisted order.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|other| other == id).map(|p| p + 1)
    }

    /// Sorts every record, backs up the existing file and rewrites it.
    ///
    /// Records that could not be read back (blank IDs, separators or line
    /// breaks in fields) fail with [`Error::Validation`] before anything is
    /// written. The in-memory store is only replaced once the write succeeds.
    pub fn sort_and_save(&mut self, sorter: &CustomerSorter) -> Result<()> {
        let sorted = sorter.sort(self.ordered().cloned());
        validate_customers(&sorted).map_err(Error::Validation)?;

        if self.path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).map_err(|e| Error::io(&backup, e))?;
        }

        write_records(&self.path, &sorted)?;
        info!(path = %self.path.display(), count = sorted.len(), "saved sorted customers");

        self.replace(sorted);
        Ok(())
    }

    /// Adds a customer, re-sorts and rewrites the file.
    ///
    /// Returns the new customer's 1-based position. Rejects blank, unsafe
    /// or already-used identifiers. If the write fails the customer is
    /// removed again and the store keeps its previous content.
    pub fn insert_sorted(&mut self, customer: Customer, sorter: &CustomerSorter) -> Result<usize> {
        let mut errors = validate_customer(&customer).err().unwrap_or_default();
        if self.records.contains_key(&customer.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate customer ID: {}", customer.id),
            ));
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let id = customer.id.clone();
        self.order.push(id.clone());
        self.records.insert(id.clone(), customer);

        let sorted = sorter.sort(self.ordered().cloned());
        if let Err(err) = write_records(&self.path, &sorted) {
            warn!(id = %id, error = %err, "save failed, rolling back insert");
            self.records.remove(&id);
            self.order.pop();
            return Err(err);
        }

        let position = sorted
            .iter()
            .position(|c| c.id == id)
            .map_or(sorted.len(), |p| p + 1);
        info!(id = %id, position, total = sorted.len(), "inserted customer");

        self.replace(sorted);
        Ok(position)
    }

    fn replace(&mut self, sorted: Vec<Customer>) {
        self.records.clear();
        self.order.clear();
        for customer in sorted {
            self.order.push(customer.id.clone());
            self.records.insert(customer.id.clone(), customer);
        }
    }
}

fn write_records(path: &Path, customers: &[Customer]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for customer in customers {
        writeln!(writer, "{}", format_record(customer)).map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}
