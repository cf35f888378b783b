/*!
 * Synchronization and Wakeup Integration Tests
 *
 * Flag/channel sync bookkeeping, wakeup targeting, queue binding and
 * concurrent sync against flag traffic
 */

mod common;

use common::{chan, flag, graph, instance, monitored, queued, state_set, synced};
use seq_core::compiler::{MonitorScope, ProgramGraph};
use seq_core::core::pv_type::PvTypeTag;
use seq_core::runtime::{InstanceConfig, MacroTable, NoMacros, Program, QueueSlots, SyncSignals};
use seq_core::{ChanId, EvFlagId, ProgramTables, QueueIndex, RegistryError, SsId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const F1: u32 = 1;
const F2: u32 = 2;
const A: ChanId = ChanId(0);
const B: ChanId = ChanId(1);
const C: ChanId = ChanId(2);

/// Two flags; A and B synced to F1, C unsynced; one state set
fn scenario_graph() -> ProgramGraph {
    let mut g = graph("scenario");
    g.event_flags = vec![flag("f1"), flag("f2")];
    g.channels = vec![
        synced(monitored(chan("a", PvTypeTag::Double), MonitorScope::Program), F1),
        synced(chan("b", PvTypeTag::Double), F1),
        chan("c", PvTypeTag::Int),
    ];
    g.state_sets = vec![state_set("watch", &["wait"])];
    g
}

/// Run one condition evaluation touching channel A and flag F2
fn evaluate_a_and_f2(program: &Program, ss: SsId) {
    let state_set = program.state_set(ss);
    state_set.begin_when_eval();
    program.pv_offset(Some(ss), A);
    program.ef_test(ss, EvFlagId::new(F2));
    state_set.end_when_eval();
}

fn synced_channels(program: &Program, ef: u32) -> Vec<usize> {
    program
        .event_flag(EvFlagId::new(ef))
        .synced()
        .iter_ones()
        .collect()
}

#[test]
fn test_scenario_sync_and_wakeup() {
    let (program, recorder) = instance(&scenario_graph());

    assert_eq!(synced_channels(&program, F1), vec![A.index(), B.index()]);
    assert!(synced_channels(&program, F2).is_empty());
    assert_eq!(program.channel(C).synced_to(), None);

    evaluate_a_and_f2(&program, SsId(0));

    program.ef_set(EvFlagId::new(F1));
    assert!(recorder.woken().is_empty());

    program.ef_set(EvFlagId::new(F2));
    assert_eq!(recorder.woken(), vec![SsId(0)]);

    program.pv_sync(A, Some(EvFlagId::new(F2)));
    assert_eq!(synced_channels(&program, F1), vec![B.index()]);
    assert_eq!(synced_channels(&program, F2), vec![A.index()]);
    assert_eq!(program.channel(A).synced_to(), Some(EvFlagId::new(F2)));
}

#[test]
fn test_wakeup_exactly_once_per_set_and_clear() {
    let mut g = scenario_graph();
    g.state_sets.push(state_set("other", &["idle"]));
    let (program, recorder) = instance(&g);

    evaluate_a_and_f2(&program, SsId(0));
    evaluate_a_and_f2(&program, SsId(1));

    let f2 = EvFlagId::new(F2);
    program.ef_set(f2);
    assert_eq!(recorder.woken(), vec![SsId(0), SsId(1)]);

    recorder.reset();
    assert!(program.ef_clear(f2));
    assert_eq!(recorder.woken(), vec![SsId(0), SsId(1)]);

    recorder.reset();
    assert_eq!(program.wakeup(program.channel(A).event_number()), 2);
    assert_eq!(program.wakeup(program.channel(C).event_number()), 0);
}

#[test]
fn test_reevaluation_replaces_interest() {
    let (program, recorder) = instance(&scenario_graph());
    let ss = SsId(0);

    evaluate_a_and_f2(&program, ss);

    // Next state only looks at F1
    let state_set = program.state_set(ss);
    state_set.begin_when_eval();
    program.ef_test(ss, EvFlagId::new(F1));
    state_set.end_when_eval();

    program.ef_set(EvFlagId::new(F2));
    assert!(recorder.woken().is_empty());
    program.ef_set(EvFlagId::new(F1));
    assert_eq!(recorder.woken(), vec![ss]);
}

#[test]
fn test_tests_outside_evaluation_record_nothing() {
    let (program, _) = instance(&scenario_graph());
    let ss = SsId(0);
    program.ef_test(ss, EvFlagId::new(F1));
    program.pv_offset(Some(ss), C);
    assert!(program.state_set(ss).event_mask().is_empty());
}

#[test]
fn test_unsync_and_resync_keep_exclusivity() {
    let (program, _) = instance(&scenario_graph());

    program.pv_array_sync(&[A, B, C], Some(EvFlagId::new(F2)));
    assert!(synced_channels(&program, F1).is_empty());
    assert_eq!(synced_channels(&program, F2), vec![0, 1, 2]);

    program.pv_sync(B, None);
    assert_eq!(program.channel(B).synced_to(), None);
    assert_eq!(synced_channels(&program, F2), vec![0, 2]);

    // Syncing to the current flag is a no-op
    program.pv_sync(A, Some(EvFlagId::new(F2)));
    assert_eq!(synced_channels(&program, F2), vec![0, 2]);
}

#[test]
fn test_channel_event_sets_synced_flag_and_wakes() {
    let (program, recorder) = instance(&scenario_graph());
    evaluate_a_and_f2(&program, SsId(0));

    program.channel_event(B);
    assert!(program.event_flag(EvFlagId::new(F1)).value());
    assert!(recorder.woken().is_empty());

    program.channel_event(A);
    // Interested in A itself
    assert_eq!(recorder.woken(), vec![SsId(0)]);
}

#[test]
fn test_channel_registry_contents() {
    let (program, _) = instance(&scenario_graph());

    assert_eq!(program.num_event_flags(), 2);
    assert_eq!(program.num_channels(), 3);
    assert_eq!(program.assign_count(), 3);
    // Only A is monitored
    assert_eq!(program.monitor_count(), 1);
    assert!(program.state_set(SsId(0)).monitors(A));
    assert!(!program.state_set(SsId(0)).monitors(B));

    let a = program.channel(A);
    assert_eq!(a.event_number().0, 3);
    assert_eq!(a.db().map(|db| db.db_name.as_str()), Some("pv:a"));
    assert!(a.db().map_or(false, |db| db.monitored));
    assert_eq!(program.channel(C).event_number().0, 5);
}

#[test]
fn test_macro_names_and_anonymous_channels() {
    let mut g = scenario_graph();
    g.channels[0].pv_name = Some("{P}:a".into());
    g.channels[1].pv_name = Some("{MISSING}".into());
    g.channels[2].pv_name = None;

    let tables = Arc::new(ProgramTables::generate(&g));
    let macros = MacroTable::new().with("P", "ring");
    let program = Program::new(
        tables,
        Arc::new(SyncSignals::new(1, Default::default())),
        &macros,
        &InstanceConfig::default(),
    )
    .unwrap();

    assert_eq!(
        program.channel(A).db().map(|db| db.db_name.as_str()),
        Some("ring:a")
    );
    assert!(program.channel(B).db().is_none());
    assert!(program.channel(C).db().is_none());
    assert_eq!(program.assign_count(), 1);
}

#[test]
fn test_empty_program_builds_empty_registry() {
    let mut g = graph("empty");
    g.state_sets = vec![state_set("only", &["s0"])];

    let (program, recorder) = instance(&g);
    assert_eq!(program.num_event_flags(), 0);
    assert_eq!(program.num_channels(), 0);
    assert_eq!(program.num_state_sets(), 1);
    assert!(program.queue(QueueIndex(0)).is_none());
    assert!(recorder.woken().is_empty());
}

#[test]
fn test_bad_magic_rejected() {
    let mut tables = ProgramTables::generate(&scenario_graph());
    tables.program.magic = 7;
    let result = Program::new(
        Arc::new(tables),
        Arc::new(SyncSignals::new(1, Default::default())),
        &NoMacros,
        &InstanceConfig::default(),
    );
    assert!(matches!(result, Err(RegistryError::BadMagic(7))));
}

fn queue_graph(second: PvTypeTag, second_count: usize) -> ProgramGraph {
    let mut g = graph("queues");
    g.num_queues = 1;
    let mut b = queued(chan("b", second), 4, 0);
    b.count = second_count;
    g.channels = vec![queued(chan("a", PvTypeTag::Double), 4, 0), b];
    g.state_sets = vec![state_set("consumer", &["drain"])];
    g
}

#[test]
fn test_shared_queue_binding() {
    let (program, _) = instance(&queue_graph(PvTypeTag::Double, 1));

    let a = program.channel(A).queue().unwrap();
    let b = program.channel(B).queue().unwrap();
    assert!(Arc::ptr_eq(a, b));
    assert!(Arc::ptr_eq(a, program.queue(QueueIndex(0)).unwrap()));
    assert_eq!(a.num_elems(), 4);
    // Timestamped double: 16 bytes of header plus the value
    assert_eq!(a.elem_size(), 24);
}

#[test]
fn test_mismatched_queue_binding_fails() {
    let tables = Arc::new(ProgramTables::generate(&queue_graph(PvTypeTag::Double, 2)));
    let result = Program::new(
        tables,
        Arc::new(SyncSignals::new(1, Default::default())),
        &NoMacros,
        &InstanceConfig::default(),
    );

    match result {
        Err(RegistryError::InconsistentQueue {
            var_name,
            have_elem_size,
            want_elem_size,
            ..
        }) => {
            assert_eq!(var_name, "b");
            assert_eq!(have_elem_size, 24);
            assert_eq!(want_elem_size, 32);
        }
        other => panic!("expected inconsistent queue, got {:?}", other.err()),
    }
}

#[test]
fn test_mismatched_binding_leaves_first_queue_untouched() {
    let mut slots = QueueSlots::new(1);
    let first = slots.bind(QueueIndex(0), 5, 24, "a").unwrap();
    first.put(&[1u8; 24]);

    assert!(slots.bind(QueueIndex(0), 6, 24, "b").is_err());
    assert!(slots.bind(QueueIndex(0), 5, 12, "c").is_err());

    let kept = slots.get(QueueIndex(0)).unwrap();
    assert!(Arc::ptr_eq(&first, kept));
    assert_eq!(kept.num_elems(), 5);
    assert_eq!(kept.elem_size(), 24);
    assert_eq!(kept.used(), 1);
}

#[test]
fn test_sync_signals_wake_waiting_state_set() {
    let config = InstanceConfig::low_latency();
    let tables = Arc::new(ProgramTables::generate(&scenario_graph()));
    let (program, signals) = Program::with_signals(tables, &NoMacros, &config).unwrap();

    evaluate_a_and_f2(&program, SsId(0));

    let waiter = {
        let signals = signals.clone();
        thread::spawn(move || signals.event(SsId(0)).wait(Some(Duration::from_secs(2))))
    };

    thread::sleep(Duration::from_millis(20));
    program.ef_set(EvFlagId::new(F2));

    assert!(waiter.join().unwrap().is_ok());
    assert_eq!(signals.event(SsId(0)).signal_count(), 1);
}

#[test]
fn test_racing_syncs_of_one_channel_leave_single_owner() {
    let (program, _) = instance(&scenario_graph());
    let program = Arc::new(program);

    for round in 0..500 {
        program.pv_sync(C, None);
        let barrier = Arc::new(Barrier::new(2));

        let racers: Vec<_> = [F1, F2]
            .into_iter()
            .map(|ef| {
                let program = program.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    program.pv_sync(C, Some(EvFlagId::new(ef)));
                })
            })
            .collect();
        for racer in racers {
            racer.join().unwrap();
        }

        let owner = program.channel(C).synced_to();
        assert!(owner.is_some(), "round {}", round);
        for ef in [F1, F2] {
            let has_bit = program.event_flag(EvFlagId::new(ef)).synced().test(C.index());
            assert_eq!(has_bit, owner == Some(EvFlagId::new(ef)), "round {}", round);
        }
    }
}

#[test]
fn test_concurrent_sync_keeps_exclusivity() {
    const CHANNELS: usize = 8;
    const FLAGS: u32 = 3;

    let mut g = graph("stress");
    g.event_flags = (1..=FLAGS).map(|n| flag(&format!("f{}", n))).collect();
    g.channels = (0..CHANNELS)
        .map(|n| synced(chan(&format!("c{}", n), PvTypeTag::Long), 1))
        .collect();
    g.state_sets = vec![state_set("a", &["s"]), state_set("b", &["s"])];

    let (program, _) = instance(&g);
    let program = Arc::new(program);
    let stop = Arc::new(AtomicBool::new(false));

    let syncers: Vec<_> = (0..4)
        .map(|t| {
            let program = program.clone();
            thread::spawn(move || {
                for i in 0..2_000usize {
                    let chan = ChanId(((i + t) % CHANNELS) as u32);
                    let target = match (i * 7 + t) % (FLAGS as usize + 1) {
                        0 => None,
                        n => Some(EvFlagId::new(n as u32)),
                    };
                    program.pv_sync(chan, target);
                }
            })
        })
        .collect();

    let setters: Vec<_> = (0..2)
        .map(|t| {
            let program = program.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let ss = SsId(t);
                let mut n = 0u32;
                while !stop.load(Ordering::Relaxed) {
                    let ef = EvFlagId::new(n % FLAGS + 1);
                    let state_set = program.state_set(ss);
                    state_set.begin_when_eval();
                    program.ef_test(ss, ef);
                    state_set.end_when_eval();
                    program.ef_set(ef);
                    program.ef_clear(ef);
                    n = n.wrapping_add(1);
                }
            })
        })
        .collect();

    for handle in syncers {
        handle.join().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    for handle in setters {
        handle.join().unwrap();
    }

    for n in 0..CHANNELS {
        let chan = ChanId(n as u32);
        let synced_to = program.channel(chan).synced_to();
        for ef in 1..=FLAGS {
            let has_bit = program.event_flag(EvFlagId::new(ef)).synced().test(n);
            assert_eq!(has_bit, synced_to == Some(EvFlagId::new(ef)), "channel {}", chan);
        }
    }
}
