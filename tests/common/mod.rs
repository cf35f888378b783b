/*!
 * Shared Test Fixtures
 * Program graph builders and a recording scheduler
 */

#![allow(dead_code)]

use parking_lot::Mutex;
use seq_core::compiler::{
    ChanDecl, EvFlagDecl, MonitorScope, ProgramGraph, QueueDecl, StateDecl, StateSetDecl,
};
use seq_core::core::mask::Mask;
use seq_core::core::pv_type::PvTypeTag;
use seq_core::runtime::{InstanceConfig, NoMacros, Program, Scheduler};
use seq_core::{EvFlagId, ProgramTables, QueueIndex, SsId};
use std::sync::Arc;

/// Scheduler that records every wakeup in call order
#[derive(Default)]
pub struct Recorder {
    pub woken: Mutex<Vec<SsId>>,
    pub reads: Mutex<Vec<(SsId, EvFlagId, Mask)>>,
}

impl Recorder {
    pub fn woken(&self) -> Vec<SsId> {
        self.woken.lock().clone()
    }

    pub fn reset(&self) {
        self.woken.lock().clear();
        self.reads.lock().clear();
    }
}

impl Scheduler for Recorder {
    fn wake(&self, ss: SsId) {
        self.woken.lock().push(ss);
    }

    fn read_buffer_selective(&self, ss: SsId, ef: EvFlagId, synced: &Mask) {
        self.reads.lock().push((ss, ef, synced.clone()));
    }
}

pub fn graph(name: &str) -> ProgramGraph {
    ProgramGraph {
        name: name.into(),
        param: String::new(),
        options: Default::default(),
        var_size: 0,
        has_entry: false,
        has_exit: false,
        event_flags: Vec::new(),
        channels: Vec::new(),
        state_sets: Vec::new(),
        num_queues: 0,
    }
}

pub fn flag(name: &str) -> EvFlagDecl {
    EvFlagDecl {
        name: name.into(),
        initial: false,
    }
}

pub fn chan(var_name: &str, type_tag: PvTypeTag) -> ChanDecl {
    ChanDecl {
        var_name: var_name.into(),
        pv_name: Some(format!("pv:{}", var_name)),
        val_offset: 0,
        type_tag,
        count: 1,
        sync_flag: None,
        monitors: Vec::new(),
        queue: None,
    }
}

pub fn synced(mut chan: ChanDecl, ef: u32) -> ChanDecl {
    chan.sync_flag = Some(EvFlagId::new(ef));
    chan
}

pub fn monitored(mut chan: ChanDecl, scope: MonitorScope) -> ChanDecl {
    chan.monitors.push(scope);
    chan
}

pub fn queued(mut chan: ChanDecl, size: usize, index: u32) -> ChanDecl {
    chan.queue = Some(QueueDecl {
        size,
        index: QueueIndex(index),
    });
    chan
}

pub fn state_set(name: &str, states: &[&str]) -> StateSetDecl {
    StateSetDecl {
        name: name.into(),
        states: states
            .iter()
            .map(|s| StateDecl {
                name: (*s).into(),
                has_entry: false,
                has_exit: false,
                options: Default::default(),
            })
            .collect(),
    }
}

/// Build a live instance with a recording scheduler
pub fn instance(graph: &ProgramGraph) -> (Program, Arc<Recorder>) {
    let tables = Arc::new(ProgramTables::generate(graph));
    let recorder = Arc::new(Recorder::default());
    let program = Program::new(
        tables,
        recorder.clone(),
        &NoMacros,
        &InstanceConfig::default(),
    )
    .expect("program construction");
    (program, recorder)
}
