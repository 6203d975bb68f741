//! Contact aggregation and phone-number lookups.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::oneshot;

use super::gate::{ErrorReporter, PermissionGate};
use super::source::{ContactDataSource, PhoneLookup};
use crate::error::{ContactsError, ContactsResult};
use crate::models::Contact;

const WORKER_THREAD_NAME: &str = "contacts-aggregator";

pub struct ContactsHelper<S> {
    source: Arc<S>,
    gate: Arc<dyn PermissionGate>,
    reporter: Arc<dyn ErrorReporter>,
}

impl<S: ContactDataSource + 'static> ContactsHelper<S> {
    pub fn new(source: Arc<S>, gate: Arc<dyn PermissionGate>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            source,
            gate,
            reporter,
        }
    }

    /// Aggregate contacts on a background thread and hand the result to
    /// `callback` exactly once.
    ///
    /// Returns `ContactsError::Worker` if the thread cannot be started, in
    /// which case `callback` is never called.
    pub fn get_available_contacts<F>(&self, callback: F) -> ContactsResult<JoinHandle<()>>
    where
        F: FnOnce(ContactsResult<Vec<Contact>>) + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || callback(aggregate(source.as_ref())))
            .map_err(ContactsError::Worker)
    }

    /// Same as [`get_available_contacts`](Self::get_available_contacts), with
    /// the result delivered over a single-shot channel.
    pub fn available_contacts(&self) -> ContactsResult<oneshot::Receiver<ContactsResult<Vec<Contact>>>> {
        let (tx, rx) = oneshot::channel();
        self.get_available_contacts(move |result| {
            // Receiver dropped means nobody wants the result anymore.
            let _ = tx.send(result);
        })?;
        Ok(rx)
    }

    /// Await the background aggregation.
    pub async fn load_available_contacts(&self) -> ContactsResult<Vec<Contact>> {
        let rx = self.available_contacts()?;
        rx.await.map_err(|_| ContactsError::WorkerGone)?
    }

    /// Run the aggregation on the calling thread.
    pub fn collect_available_contacts(&self) -> ContactsResult<Vec<Contact>> {
        aggregate(self.source.as_ref())
    }

    /// Display name for `number`, or `number` itself when it cannot be resolved.
    pub fn name_from_phone_number(&self, number: &str) -> String {
        match self.lookup(number) {
            Some(PhoneLookup {
                display_name: Some(name),
                ..
            }) if !name.is_empty() => name,
            _ => number.to_string(),
        }
    }

    /// Photo reference for `number`, or an empty string when it cannot be resolved.
    pub fn photo_uri_from_phone_number(&self, number: &str) -> String {
        self.lookup(number)
            .and_then(|found| found.photo_uri)
            .unwrap_or_default()
    }

    /// `"<lookup key>/<contact id>"` for a raw contact, or an empty string
    /// when it has no structured name.
    pub fn contact_lookup_key(&self, raw_id: i64) -> ContactsResult<String> {
        let row = self.source.lookup_key(raw_id)?;
        Ok(row
            .map(|r| format!("{}/{}", r.lookup_key.unwrap_or_default(), r.contact_id))
            .unwrap_or_default())
    }

    fn lookup(&self, number: &str) -> Option<PhoneLookup> {
        if !self.gate.has_read_contacts_permission() {
            return None;
        }

        match self.source.phone_lookup(number) {
            Ok(found) => found,
            Err(e) => {
                self.reporter.report(&e);
                None
            }
        }
    }
}

fn aggregate<S: ContactDataSource + ?Sized>(source: &S) -> ContactsResult<Vec<Contact>> {
    let names = contact_names(source)?;
    let numbers = contact_phone_numbers(source)?;
    let merged = merge_contacts(&names, numbers);
    tracing::debug!(
        names = names.len(),
        contacts = merged.len(),
        "aggregated contacts"
    );
    Ok(merged)
}

fn contact_names<S: ContactDataSource + ?Sized>(source: &S) -> ContactsResult<Vec<Contact>> {
    Ok(source
        .name_rows()?
        .into_iter()
        .filter_map(|row| row.into_contact())
        .collect())
}

fn contact_phone_numbers<S: ContactDataSource + ?Sized>(source: &S) -> ContactsResult<Vec<Contact>> {
    Ok(source
        .phone_rows()?
        .into_iter()
        .filter_map(|row| match row.normalized_number {
            Some(number) if !number.is_empty() => {
                Some(Contact::with_number(row.raw_id, row.contact_id, number))
            }
            _ => None,
        })
        .collect())
}

/// Join phone records with the first name record of the same raw contact,
/// drop unnamed ones, keep the first record per dedup key, then sort.
pub fn merge_contacts(names: &[Contact], numbers: Vec<Contact>) -> Vec<Contact> {
    let mut first_by_raw_id: HashMap<i64, &Contact> = HashMap::new();
    for name in names {
        first_by_raw_id.entry(name.raw_id).or_insert(name);
    }

    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut merged: Vec<Contact> = numbers
        .into_iter()
        .map(|mut contact| {
            if let Some(named) = first_by_raw_id.get(&contact.raw_id) {
                if !named.name.is_empty() {
                    contact.name = named.name.clone();
                }
                if !named.photo_uri.is_empty() {
                    contact.photo_uri = named.photo_uri.clone();
                }
            }
            contact
        })
        .filter(|contact| !contact.name.is_empty())
        .filter(|contact| seen_keys.insert(contact.dedup_key().to_string()))
        .collect();

    merged.sort();
    merged
}
