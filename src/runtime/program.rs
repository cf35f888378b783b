/*!
 * Program Registry
 * Per-instance control blocks built from the shared program tables
 *
 * Many instances may be built from one `Arc<ProgramTables>`; the tables are
 * never mutated. Everything an instance changes at run time lives in its own
 * event flag, channel and state set control blocks, addressed by typed index.
 */

use super::channel::{Channel, ChannelState, DbChannel};
use super::config::InstanceConfig;
use super::evflag::EventFlag;
use super::macros::MacroEvaluator;
use super::queue::{QueueSlots, SeqQueue};
use super::state_set::StateSet;
use super::traits::{Scheduler, SyncSignals};
use crate::compiler::options::ProgramOptionBits;
use crate::compiler::tables::{ChanEntry, ProgramTables};
use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::limits::PROGRAM_MAGIC;
use crate::core::types::{ChanId, EvFlagId, QueueIndex, SsId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Live registry of one program instance
pub struct Program {
    pub(super) tables: Arc<ProgramTables>,
    pub(super) options: ProgramOptionBits,
    pub(super) event_flags: Vec<EventFlag>,
    pub(super) channels: Vec<Channel>,
    pub(super) state_sets: Vec<StateSet>,
    pub(super) queues: QueueSlots,
    pub(super) scheduler: Arc<dyn Scheduler>,
    assign_count: usize,
    monitor_count: usize,
}

impl Program {
    /// Build an instance, applying every declared sync and monitor
    ///
    /// Any failure is fatal to the instance: it is logged and construction is
    /// abandoned.
    pub fn new(
        tables: Arc<ProgramTables>,
        scheduler: Arc<dyn Scheduler>,
        macros: &dyn MacroEvaluator,
        config: &InstanceConfig,
    ) -> RegistryResult<Self> {
        let name = tables.program.name.clone();
        Self::build(tables, scheduler, macros, config).map_err(|e| {
            error!(program = %name, severity = "fatal", error = %e, "program instance construction failed");
            e
        })
    }

    /// Build an instance woken through its own `SyncSignals`
    ///
    /// Each state set gets one wakeup event configured by `config.wakeup`;
    /// the returned signals are what the state set tasks wait on.
    pub fn with_signals(
        tables: Arc<ProgramTables>,
        macros: &dyn MacroEvaluator,
        config: &InstanceConfig,
    ) -> RegistryResult<(Self, Arc<SyncSignals>)> {
        let signals = Arc::new(SyncSignals::new(
            tables.num_state_sets(),
            config.wakeup.clone(),
        ));
        let program = Self::new(tables, signals.clone(), macros, config)?;
        Ok((program, signals))
    }

    fn build(
        tables: Arc<ProgramTables>,
        scheduler: Arc<dyn Scheduler>,
        macros: &dyn MacroEvaluator,
        config: &InstanceConfig,
    ) -> RegistryResult<Self> {
        if tables.program.magic != PROGRAM_MAGIC {
            return Err(RegistryError::BadMagic(tables.program.magic));
        }

        let num_channels = tables.num_channels();
        let max_event = tables.max_event_number();

        let queues = QueueSlots::new(tables.program.num_queues);

        let event_flags = tables
            .event_flags
            .iter()
            .map(|ef| EventFlag::create(&ef.name, ef.initial, num_channels))
            .collect::<RegistryResult<Vec<_>>>()?;

        let state_sets = tables
            .state_sets
            .iter()
            .enumerate()
            .map(|(n, ss)| {
                StateSet::new(SsId(n as u32), &ss.name, ss.num_states, num_channels, max_event)
            })
            .collect();

        let mut program = Self {
            options: tables.program.options,
            event_flags,
            channels: Vec::with_capacity(num_channels),
            state_sets,
            queues,
            scheduler,
            assign_count: 0,
            monitor_count: 0,
            tables: tables.clone(),
        };

        for (n, entry) in tables.channels.iter().enumerate() {
            let channel = program.create_channel(ChanId(n as u32), entry, macros, config)?;
            program.channels.push(channel);
        }

        info!(
            program = %program.tables.program.name,
            event_flags = program.event_flags.len(),
            channels = program.channels.len(),
            state_sets = program.state_sets.len(),
            assigned = program.assign_count,
            monitored = program.monitor_count,
            "program instance created"
        );

        Ok(program)
    }

    fn create_channel(
        &mut self,
        chan: ChanId,
        entry: &ChanEntry,
        macros: &dyn MacroEvaluator,
        config: &InstanceConfig,
    ) -> RegistryResult<Channel> {
        assert!(chan.index() < self.tables.num_channels());

        let count = entry.count.max(1);

        if let Some(ef) = entry.sync_flag {
            self.event_flag(ef).lock().synced.set(chan.index());
        }

        let type_info = entry.type_tag.info();

        let db = match &entry.pv_name {
            Some(expr) => {
                let db_name = eval_pv_name(macros, expr, config)?;
                // Names that evaluate to nothing stay anonymous
                (!db_name.is_empty()).then(|| {
                    self.assign_count += 1;
                    DbChannel {
                        db_name,
                        monitored: false,
                    }
                })
            }
            None => None,
        };

        let mut channel = Channel {
            var_name: entry.var_name.clone(),
            offset: entry.val_offset,
            count,
            event_num: chan.event_number(self.event_flags.len()),
            type_info,
            mon_mask: entry.mon_mask,
            db,
            queue: None,
            state: Mutex::new(ChannelState {
                synced_to: entry.sync_flag,
            }),
        };

        let mon_mask = self.tables.monitor_mask(chan);
        for ss in self.state_sets.iter_mut() {
            if mon_mask.test(ss.id().index()) {
                ss.monitored[chan.index()] = true;
                if let Some(db) = channel.db.as_mut() {
                    if !db.monitored {
                        db.monitored = true;
                        self.monitor_count += 1;
                    }
                }
            }
        }

        if let Some(queue) = entry.queue {
            // The whole transport message is queued so status and timestamp survive
            let elem_size = type_info.get_type.size_n(count);
            channel.queue = Some(
                self.queues
                    .bind(queue.index, queue.size, elem_size, &entry.var_name)?,
            );
        }

        debug!(
            var = %channel.var_name,
            event = channel.event_num.0,
            db_name = channel.db.as_ref().map(|db| db.db_name.as_str()),
            synced_to = entry.sync_flag.map(|ef| ef.get()),
            "channel created"
        );

        Ok(channel)
    }

    pub fn name(&self) -> &str {
        &self.tables.program.name
    }

    pub fn tables(&self) -> &Arc<ProgramTables> {
        &self.tables
    }

    pub fn options(&self) -> ProgramOptionBits {
        self.options
    }

    /// Flag tests refresh synced buffers when running in safe mode
    pub fn is_safe(&self) -> bool {
        self.options.contains(ProgramOptionBits::SAFE)
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

    /// Number of channels bound to an external name
    pub fn assign_count(&self) -> usize {
        self.assign_count
    }

    /// Number of named channels monitored by at least one state set
    pub fn monitor_count(&self) -> usize {
        self.monitor_count
    }

    pub fn event_flag(&self, ef: EvFlagId) -> &EventFlag {
        assert!(ef.get() >= 1, "event flag numbers start at 1");
        assert!(
            ef.get() as usize <= self.event_flags.len(),
            "event flag {} out of range",
            ef
        );
        &self.event_flags[ef.slot()]
    }

    pub fn channel(&self, chan: ChanId) -> &Channel {
        assert!(
            chan.index() < self.channels.len(),
            "channel {} out of range",
            chan
        );
        &self.channels[chan.index()]
    }

    pub fn state_set(&self, ss: SsId) -> &StateSet {
        assert!(
            ss.index() < self.state_sets.len(),
            "state set {} out of range",
            ss
        );
        &self.state_sets[ss.index()]
    }

    pub fn queue(&self, index: QueueIndex) -> Option<&Arc<SeqQueue>> {
        self.queues.get(index)
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }
}

/// Evaluate a name expression into a buffer of the configured size
fn eval_pv_name(
    macros: &dyn MacroEvaluator,
    expr: &str,
    config: &InstanceConfig,
) -> RegistryResult<String> {
    let evaluated = macros.eval(expr);
    let max_len = config.max_pv_name_len();

    let mut end = evaluated.len().min(max_len);
    while !evaluated.is_char_boundary(end) {
        end -= 1;
    }

    let mut name = String::new();
    name.try_reserve_exact(end)
        .map_err(|_| RegistryError::AllocationFailed(format!("name buffer for {}", expr)))?;
    name.push_str(&evaluated[..end]);
    Ok(name)
}
