/*!
 * Static Table Generator
 * Read-only descriptors for event flags, channels, states, state sets and the program
 *
 * Tables are a pure function of the program graph. Absent optional parts
 * (no event flags, no channels, no entry/exit function) are encoded as empty
 * tables and `None` references, never as errors.
 */

use super::graph::{ProgramGraph, QueueDecl, StateDecl};
use super::options::{ProgramOptionBits, StateOptionBits};
use super::pool::MonitorMaskPool;
use crate::core::limits::{
    NM_CHANS, NM_ENTRY, NM_EVFLAGS, NM_EXIT, NM_INIT, NM_STATES, NM_STATESETS, NM_TRANS,
    PROGRAM_MAGIC,
};
use crate::core::mask::Mask;
use crate::core::pv_type::PvTypeTag;
use crate::core::types::{ChanId, EvFlagId, EventNumber, MaskIndex};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvFlagEntry {
    pub name: String,
    pub initial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanEntry {
    pub var_name: String,
    pub pv_name: Option<String>,
    pub val_offset: usize,
    pub type_tag: PvTypeTag,
    pub count: usize,
    pub sync_flag: Option<EvFlagId>,
    pub mon_mask: MaskIndex,
    pub queue: Option<QueueDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub name: String,
    pub transition: String,
    pub entry: Option<String>,
    pub exit: Option<String>,
    pub options: StateOptionBits,
}

/// States of one state set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTable {
    pub symbol: String,
    pub state_set: String,
    pub states: Vec<StateEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSetEntry {
    pub name: String,
    pub states: String,
    pub num_states: usize,
}

/// The single per-program descriptor
///
/// Table references are `None` where the generated code uses the null sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDescriptor {
    pub magic: u32,
    pub name: String,
    pub channels: Option<String>,
    pub num_channels: usize,
    pub state_sets: String,
    pub num_state_sets: usize,
    pub user_var_size: usize,
    pub param: String,
    pub event_flags: Option<String>,
    pub num_event_flags: usize,
    pub options: ProgramOptionBits,
    pub init: String,
    pub entry: Option<String>,
    pub exit: Option<String>,
    pub num_queues: usize,
}

/// All generated tables of one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramTables {
    pub event_flags: Vec<EvFlagEntry>,
    pub monitor_masks: Vec<Mask>,
    pub channels: Vec<ChanEntry>,
    pub state_tables: Vec<StateTable>,
    pub state_sets: Vec<StateSetEntry>,
    pub program: ProgramDescriptor,
}

impl ProgramTables {
    /// Generate the tables for a validated program graph
    pub fn generate(graph: &ProgramGraph) -> Self {
        let event_flags = gen_evflag_table(graph);
        let (pool, mask_indices) = MonitorMaskPool::build(&graph.channels, graph.num_state_sets());
        let channels = gen_channel_table(graph, &mask_indices);
        let state_tables = gen_state_tables(graph);
        let state_sets = gen_ss_table(&state_tables);
        let program = gen_prog_table(graph);

        info!(
            program = %graph.name,
            event_flags = event_flags.len(),
            channels = channels.len(),
            monitor_masks = pool.len(),
            state_sets = state_sets.len(),
            "generated program tables"
        );

        Self {
            event_flags,
            monitor_masks: pool.into_masks(),
            channels,
            state_tables,
            state_sets,
            program,
        }
    }

    pub fn num_event_flags(&self) -> usize {
        self.event_flags.len()
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_state_sets(&self) -> usize {
        self.state_sets.len()
    }

    /// Largest event number in use, which sizes every event mask
    pub fn max_event_number(&self) -> usize {
        EventNumber::max_for(self.num_event_flags(), self.num_channels())
    }

    /// Monitor mask of a channel
    pub fn monitor_mask(&self, chan: ChanId) -> &Mask {
        &self.monitor_masks[self.channels[chan.index()].mon_mask.index()]
    }
}

fn gen_evflag_table(graph: &ProgramGraph) -> Vec<EvFlagEntry> {
    graph
        .event_flags
        .iter()
        .map(|ef| EvFlagEntry {
            name: ef.name.clone(),
            initial: ef.initial,
        })
        .collect()
}

fn gen_channel_table(graph: &ProgramGraph, mask_indices: &[MaskIndex]) -> Vec<ChanEntry> {
    graph
        .channels
        .iter()
        .zip(mask_indices)
        .map(|(chan, &mon_mask)| ChanEntry {
            var_name: chan.var_name.clone(),
            pv_name: chan.pv_name.clone(),
            val_offset: chan.val_offset,
            type_tag: chan.type_tag,
            count: chan.count,
            sync_flag: chan.sync_flag,
            mon_mask,
            queue: chan.queue,
        })
        .collect()
}

fn gen_state_tables(graph: &ProgramGraph) -> Vec<StateTable> {
    graph
        .state_sets
        .iter()
        .enumerate()
        .map(|(ss_num, ss)| StateTable {
            symbol: format!("{}_{}", NM_STATES, ss.name),
            state_set: ss.name.clone(),
            states: ss
                .states
                .iter()
                .map(|state| fill_state_entry(state, &ss.name, ss_num))
                .collect(),
        })
        .collect()
}

fn fill_state_entry(state: &StateDecl, ss_name: &str, ss_num: usize) -> StateEntry {
    let symbol = |prefix: &str| format!("{}_{}_{}_{}", prefix, ss_name, ss_num, state.name);
    StateEntry {
        name: state.name.clone(),
        transition: symbol(NM_TRANS),
        entry: state.has_entry.then(|| symbol(NM_ENTRY)),
        exit: state.has_exit.then(|| symbol(NM_EXIT)),
        options: state.options.encode(),
    }
}

fn gen_ss_table(state_tables: &[StateTable]) -> Vec<StateSetEntry> {
    state_tables
        .iter()
        .map(|table| StateSetEntry {
            name: table.state_set.clone(),
            states: table.symbol.clone(),
            num_states: table.states.len(),
        })
        .collect()
}

fn gen_prog_table(graph: &ProgramGraph) -> ProgramDescriptor {
    ProgramDescriptor {
        magic: PROGRAM_MAGIC,
        name: graph.name.clone(),
        channels: (!graph.channels.is_empty()).then(|| NM_CHANS.to_string()),
        num_channels: graph.num_channels(),
        state_sets: NM_STATESETS.to_string(),
        num_state_sets: graph.num_state_sets(),
        user_var_size: if graph.options.reent { graph.var_size } else { 0 },
        param: graph.param.clone(),
        event_flags: (!graph.event_flags.is_empty()).then(|| NM_EVFLAGS.to_string()),
        num_event_flags: graph.num_event_flags(),
        options: graph.options.encode(),
        init: NM_INIT.to_string(),
        entry: graph.has_entry.then(|| NM_ENTRY.to_string()),
        exit: graph.has_exit.then(|| NM_EXIT.to_string()),
        num_queues: graph.num_queues,
    }
}
