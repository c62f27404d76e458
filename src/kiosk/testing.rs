//! Scripted collaborators for exercising the kiosk without hardware or a database.

use super::{
    boarding_pass::BoardingPass,
    device::{BiometricTemplate, Device, DeviceError, TemplateNumber},
    store::BoardingPassStore,
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Blink,
    Steady,
    Off,
    Verify,
    Capture,
    Register,
    Find(TemplateNumber),
    Upsert(TemplateNumber),
    Close,
}

pub(crate) type Log = Arc<Mutex<Vec<Event>>>;

pub(crate) fn record(log: &Log, event: Event) {
    if let Ok(mut events) = log.lock() {
        events.push(event);
    }
}

pub(crate) fn events(log: &Log) -> Vec<Event> {
    log.lock().map(|events| events.clone()).unwrap_or_default()
}

/// Device that answers from a script. `None` means the device says "fail".
/// With `stall_verify` the 1:N match waits for a finger that never comes.
pub(crate) struct ScriptedDevice {
    pub(crate) log: Log,
    pub(crate) verified: Option<TemplateNumber>,
    pub(crate) captured: Option<BiometricTemplate>,
    pub(crate) assigned: Option<TemplateNumber>,
    pub(crate) stall_verify: bool,
}

fn rejected() -> DeviceError {
    DeviceError::Rejected("fail".to_string())
}

#[async_trait]
impl Device for ScriptedDevice {
    async fn signal_blink(&self) {
        record(&self.log, Event::Blink);
    }

    async fn signal_steady(&self) {
        record(&self.log, Event::Steady);
    }

    async fn signal_off(&self) {
        record(&self.log, Event::Off);
    }

    async fn verify_one(&self) -> Result<TemplateNumber, DeviceError> {
        record(&self.log, Event::Verify);
        if self.stall_verify {
            std::future::pending::<()>().await;
        }
        self.verified.ok_or_else(rejected)
    }

    async fn capture_template(&self) -> Result<BiometricTemplate, DeviceError> {
        record(&self.log, Event::Capture);
        self.captured.clone().ok_or_else(rejected)
    }

    async fn register_template(
        &self,
        _template: &BiometricTemplate,
    ) -> Result<TemplateNumber, DeviceError> {
        record(&self.log, Event::Register);
        self.assigned.ok_or_else(rejected)
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    pub(crate) log: Log,
    pub(crate) rows: Mutex<HashMap<TemplateNumber, BoardingPass>>,
    pub(crate) broken: bool,
}

impl MemoryStore {
    pub(crate) fn get(&self, number: TemplateNumber) -> Option<BoardingPass> {
        self.rows.lock().ok()?.get(&number).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }
}

#[async_trait]
impl BoardingPassStore for MemoryStore {
    async fn find_by_template_number(
        &self,
        number: TemplateNumber,
    ) -> Result<Option<BoardingPass>, sqlx::Error> {
        record(&self.log, Event::Find(number));
        if self.broken {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(self.get(number))
    }

    async fn upsert_by_template_number(
        &self,
        number: TemplateNumber,
        pass: &BoardingPass,
    ) -> Result<(), sqlx::Error> {
        record(&self.log, Event::Upsert(number));
        if self.broken {
            return Err(sqlx::Error::PoolClosed);
        }
        let mut rows = self.rows.lock().map_err(|_| sqlx::Error::PoolClosed)?;
        rows.insert(
            number,
            BoardingPass {
                verified_template_number: number,
                ..pass.clone()
            },
        );
        Ok(())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        if self.broken {
            Err(sqlx::Error::PoolClosed)
        } else {
            Ok(())
        }
    }

    async fn close(&self) {
        record(&self.log, Event::Close);
    }
}
