/*!
 * C Table Emitter
 * Renders generated tables as C source for the back end
 */

use super::options::{ProgramOptionBits, StateOptionBits};
use super::tables::{ChanEntry, ProgramTables, StateEntry};
use crate::core::limits::{NM_CHANS, NM_EVFLAGS, NM_MONMASK, NM_STATESETS, NM_VARS};
use std::fmt::{self, Write};

/// Render all tables in generation order
pub fn render_c(tables: &ProgramTables) -> String {
    let mut out = String::new();
    write_c(&mut out, tables).expect("writing to a String cannot fail");
    out
}

/// Render all tables into any formatter sink
pub fn write_c<W: Write>(out: &mut W, tables: &ProgramTables) -> fmt::Result {
    writeln!(out, "\n/************************ Tables ************************/")?;
    write_evflag_table(out, tables)?;
    write_monitor_masks(out, tables)?;
    write_channel_table(out, tables)?;
    write_state_tables(out, tables)?;
    write_ss_table(out, tables)?;
    write_prog_table(out, tables)
}

fn write_evflag_table<W: Write>(out: &mut W, tables: &ProgramTables) -> fmt::Result {
    if tables.event_flags.is_empty() {
        writeln!(out, "\n/* No event flag definitions */")?;
        return writeln!(out, "#define {} 0", NM_EVFLAGS);
    }
    writeln!(out, "\n/* Event flag table */")?;
    writeln!(out, "static seqEvFlag {}[] = {{", NM_EVFLAGS)?;
    for ef in &tables.event_flags {
        writeln!(out, "\t{{ \"{}\", {} }},", ef.name, u8::from(ef.initial))?;
    }
    writeln!(out, "}};")
}

fn write_monitor_masks<W: Write>(out: &mut W, tables: &ProgramTables) -> fmt::Result {
    writeln!(out, "\n/* Monitor masks */")?;
    for (n, mask) in tables.monitor_masks.iter().enumerate() {
        writeln!(out, "static const seqMask {}_{}[] = {{", NM_MONMASK, n)?;
        for word in mask.words() {
            writeln!(out, "\t0x{:08x},", word)?;
        }
        writeln!(out, "}};")?;
    }
    Ok(())
}

fn write_channel_table<W: Write>(out: &mut W, tables: &ProgramTables) -> fmt::Result {
    if tables.channels.is_empty() {
        writeln!(out, "\n/* No channel definitions */")?;
        return writeln!(out, "#define {} 0", NM_CHANS);
    }
    writeln!(out, "\n/* Channel table */")?;
    writeln!(out, "static seqChan {}[] = {{", NM_CHANS)?;
    writeln!(
        out,
        "\t/* chName, valOffset, expr, type, count, efNum, monMask, queueSize, queueIndex */"
    )?;
    for chan in &tables.channels {
        write_channel_entry(out, chan)?;
    }
    writeln!(out, "}};")
}

fn write_channel_entry<W: Write>(out: &mut W, chan: &ChanEntry) -> fmt::Result {
    let pv_name = match &chan.pv_name {
        Some(name) => format!("\"{}\"", name),
        None => "0".to_string(),
    };
    let (queue_size, queue_index) = chan
        .queue
        .map(|q| (q.size, q.index.0))
        .unwrap_or((0, 0));
    writeln!(
        out,
        "\t{{{}, {}, \"{}\", {}, {}, {}, {}_{}, {}, {}}},",
        pv_name,
        chan.val_offset,
        chan.var_name,
        chan.type_tag.c_tag(),
        chan.count,
        chan.sync_flag.map_or(0, |ef| ef.get()),
        NM_MONMASK,
        chan.mon_mask.0,
        queue_size,
        queue_index,
    )
}


fn write_state_tables<W: Write>(out: &mut W, tables: &ProgramTables) -> fmt::Result {
    for table in &tables.state_tables {
        writeln!(out, "\n/* State table for state set \"{}\" */", table.state_set)?;
        writeln!(out, "static seqState {}[] = {{", table.symbol)?;
        for state in &table.states {
            write_state_entry(out, state)?;
        }
        writeln!(out, "}};")?;
    }
    Ok(())
}

fn write_state_entry<W: Write>(out: &mut W, state: &StateEntry) -> fmt::Result {
    writeln!(out, "\t{{")?;
    writeln!(out, "\t/* state name */        \"{}\",", state.name)?;
    writeln!(out, "\t/* transition function */{},", state.transition)?;
    writeln!(out, "\t/* entry function */    {},", state.entry.as_deref().unwrap_or("0"))?;
    writeln!(out, "\t/* exit function */     {},", state.exit.as_deref().unwrap_or("0"))?;
    writeln!(out, "\t/* state options */     {}", encode_state_options(state.options))?;
    writeln!(out, "\t}},")
}

fn write_ss_table<W: Write>(out: &mut W, tables: &ProgramTables) -> fmt::Result {
    writeln!(out, "\n/* State set table */")?;
    writeln!(out, "static seqSS {}[] = {{", NM_STATESETS)?;
    for (n, ss) in tables.state_sets.iter().enumerate() {
        if n > 0 {
            writeln!(out)?;
        }
        writeln!(out, "\t{{")?;
        writeln!(out, "\t/* state set name */    \"{}\",", ss.name)?;
        writeln!(out, "\t/* states */            {},", ss.states)?;
        writeln!(out, "\t/* number of states */  {}", ss.num_states)?;
        writeln!(out, "\t}},")?;
    }
    writeln!(out, "}};")
}

fn write_prog_table<W: Write>(out: &mut W, tables: &ProgramTables) -> fmt::Result {
    let prog = &tables.program;
    writeln!(out, "\n/* Program table (global) */")?;
    writeln!(out, "seqProgram {} = {{", prog.name)?;
    writeln!(out, "\t/* magic number */      {},", prog.magic)?;
    writeln!(out, "\t/* program name */      \"{}\",", prog.name)?;
    writeln!(out, "\t/* channels */          {},", NM_CHANS)?;
    writeln!(out, "\t/* num. channels */     {},", prog.num_channels)?;
    writeln!(out, "\t/* state sets */        {},", NM_STATESETS)?;
    writeln!(out, "\t/* num. state sets */   {},", prog.num_state_sets)?;
    if prog.options.contains(ProgramOptionBits::REENT) {
        writeln!(out, "\t/* user var size */     sizeof(struct {}),", NM_VARS)?;
    } else {
        writeln!(out, "\t/* user var size */     0,")?;
    }
    writeln!(out, "\t/* param */             \"{}\",", prog.param)?;
    writeln!(out, "\t/* event flags */       {},", NM_EVFLAGS)?;
    writeln!(out, "\t/* num. event flags */  {},", prog.num_event_flags)?;
    writeln!(out, "\t/* encoded options */   {},", encode_options(prog.options))?;
    writeln!(out, "\t/* init func */         {},", prog.init)?;
    writeln!(out, "\t/* entry func */        {},", prog.entry.as_deref().unwrap_or("0"))?;
    writeln!(out, "\t/* exit func */         {},", prog.exit.as_deref().unwrap_or("0"))?;
    writeln!(out, "\t/* num. queues */       {}", prog.num_queues)?;
    writeln!(out, "}};")
}

fn encode_options(options: ProgramOptionBits) -> String {
    let mut encoded = String::from("(0");
    for (flag, name) in [
        (ProgramOptionBits::ASYNC, "OPT_ASYNC"),
        (ProgramOptionBits::CONN, "OPT_CONN"),
        (ProgramOptionBits::DEBUG, "OPT_DEBUG"),
        (ProgramOptionBits::REENT, "OPT_REENT"),
        (ProgramOptionBits::SAFE, "OPT_SAFE"),
    ] {
        if options.contains(flag) {
            encoded.push_str(" | ");
            encoded.push_str(name);
        }
    }
    encoded.push(')');
    encoded
}

fn encode_state_options(options: StateOptionBits) -> String {
    let mut encoded = String::from("(0");
    for (flag, name) in [
        (StateOptionBits::NORESETTIMERS, "OPT_NORESETTIMERS"),
        (StateOptionBits::DOENTRYFROMSELF, "OPT_DOENTRYFROMSELF"),
        (StateOptionBits::DOEXITTOSELF, "OPT_DOEXITTOSELF"),
    ] {
        if options.contains(flag) {
            encoded.push_str(" | ");
            encoded.push_str(name);
        }
    }
    encoded.push(')');
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_options() {
        assert_eq!(encode_options(ProgramOptionBits::empty()), "(0)");
        assert_eq!(
            encode_options(ProgramOptionBits::SAFE | ProgramOptionBits::ASYNC),
            "(0 | OPT_ASYNC | OPT_SAFE)"
        );
    }

    #[test]
    fn test_channel_entry_type_tags() {
        use crate::core::pv_type::PvTypeTag;
        use crate::core::types::MaskIndex;

        let expected = [
            (PvTypeTag::Char, "P_CHAR"),
            (PvTypeTag::UChar, "P_UCHAR"),
            (PvTypeTag::Short, "P_SHORT"),
            (PvTypeTag::UShort, "P_USHORT"),
            (PvTypeTag::Int, "P_INT"),
            (PvTypeTag::UInt, "P_UINT"),
            (PvTypeTag::Long, "P_LONG"),
            (PvTypeTag::ULong, "P_ULONG"),
            (PvTypeTag::Int8, "P_INT8T"),
            (PvTypeTag::UInt8, "P_UINT8T"),
            (PvTypeTag::Int16, "P_INT16T"),
            (PvTypeTag::UInt16, "P_UINT16T"),
            (PvTypeTag::Int32, "P_INT32T"),
            (PvTypeTag::UInt32, "P_UINT32T"),
            (PvTypeTag::Float, "P_FLOAT"),
            (PvTypeTag::Double, "P_DOUBLE"),
            (PvTypeTag::String, "P_STRING"),
        ];

        for (tag, c_tag) in expected {
            let chan = ChanEntry {
                var_name: "x".into(),
                pv_name: None,
                val_offset: 0,
                type_tag: tag,
                count: 1,
                sync_flag: None,
                mon_mask: MaskIndex(0),
                queue: None,
            };
            let mut out = String::new();
            write_channel_entry(&mut out, &chan).unwrap();
            assert_eq!(
                out,
                format!("\t{{0, 0, \"x\", {}, 1, 0, seqg_mon_0, 0, 0}},\n", c_tag)
            );
        }
    }

    #[test]
    fn test_encode_state_options() {
        assert_eq!(
            encode_state_options(StateOptionBits::DOEXITTOSELF),
            "(0 | OPT_DOEXITTOSELF)"
        );
    }
}
