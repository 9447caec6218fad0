//! Pipeline timing: interlocks, forwarding paths and the zero register.

mod common;

use common::asm::*;
use common::{exit_seq, run_program, TestContext, DATA_BASE};
use mips_pipeline::{RunOutcome, SimState};

fn with_exit(body: &[u32]) -> Vec<u32> {
    let mut words = body.to_vec();
    words.extend_from_slice(&exit_seq());
    words
}

#[test]
fn four_instruction_program_exits() {
    let ctx = run_program(&[li(1, 5), li(2, 10), add(3, 1, 2), SYSCALL]);
    let stats = ctx.sim.stats();

    assert_eq!(ctx.sim.state(), SimState::Exited { code: 0 });
    assert_eq!(ctx.reg(3), 15);
    assert_eq!(stats.instructions, 4);
    assert_eq!(stats.cycles, 8);
    assert_eq!(stats.interlock_cycles, 0);
    assert_eq!(stats.syscalls, 1);
    assert_eq!(stats.syscall_stall_cycles, 3);
    assert!(ctx.sim.cpu.sim_exit);
}

#[test]
fn load_use_interlocks_once() {
    let mut ctx = TestContext::new().load(&with_exit(&[
        lui(1, 0x1001),
        lw(8, 0, 1),
        add(9, 8, 8),
    ]));
    ctx.sim.cpu.memory.write_word(DATA_BASE, 7);
    assert_eq!(ctx.run(), RunOutcome::Exited { code: 0 });

    let stats = ctx.sim.stats();
    assert_eq!(ctx.reg(9), 14);
    assert_eq!(stats.interlock_cycles, 1);
    assert_eq!(stats.loads, 1);
    assert_eq!(stats.instructions, 5);
    assert_eq!(stats.cycles, 10);
}

#[test]
fn dependent_alu_chain_never_interlocks() {
    let ctx = run_program(&with_exit(&[
        li(8, 1),
        addu(9, 8, 8),
        addu(10, 9, 8),
        addu(11, 10, 9),
    ]));
    assert_eq!(ctx.reg(9), 2);
    assert_eq!(ctx.reg(10), 3);
    assert_eq!(ctx.reg(11), 5);
    assert_eq!(ctx.sim.stats().interlock_cycles, 0);
    assert_eq!(ctx.sim.stats().cycles, 10);
}

#[test]
fn zero_register_stays_zero() {
    let ctx = run_program(&with_exit(&[li(0, 5), addu(8, 0, 0), addiu(9, 0, 3)]));
    assert_eq!(ctx.reg(0), 0);
    assert_eq!(ctx.reg(8), 0);
    assert_eq!(ctx.reg(9), 3);
    assert_eq!(ctx.sim.stats().interlock_cycles, 0);
}

#[test]
fn hi_lo_forward_to_moves() {
    let ctx = run_program(&with_exit(&[
        li(8, -3),
        li(9, 5),
        mult(8, 9),
        mflo(10),
        mfhi(11),
    ]));
    assert_eq!(ctx.reg(10) as i32, -15);
    assert_eq!(ctx.reg(11), 0xFFFF_FFFF);
    assert_eq!(ctx.sim.stats().interlock_cycles, 0);
}

#[test]
fn divide_by_zero_is_defined() {
    let ctx = run_program(&with_exit(&[li(8, 9), div(8, 0), mflo(10), mfhi(11)]));
    assert_eq!(ctx.reg(10), 0xFFFF_FFFF);
    assert_eq!(ctx.reg(11), 9);
}

#[test]
fn store_data_forwards_into_memory() {
    let ctx = run_program(&with_exit(&[
        lui(1, 0x1001),
        li(8, 0x55),
        sw(8, 0, 1),
        lw(9, 0, 1),
    ]));
    let stats = ctx.sim.stats();
    assert_eq!(ctx.sim.cpu.memory.read_word(DATA_BASE), 0x55);
    assert_eq!(ctx.reg(9), 0x55);
    assert_eq!((stats.loads, stats.stores), (1, 1));
    assert_eq!(stats.interlock_cycles, 0);
}

#[test]
fn byte_store_then_signed_byte_load() {
    let ctx = run_program(&with_exit(&[
        lui(1, 0x1001),
        li(8, 0x80),
        sb(8, 3, 1),
        lb(9, 3, 1),
    ]));
    assert_eq!(ctx.sim.cpu.memory.read_word(DATA_BASE), 0x0000_0080);
    assert_eq!(ctx.reg(9), 0xFFFF_FF80);
}

#[test]
fn unaligned_word_via_lwl_lwr() {
    let mut ctx = TestContext::new().load(&with_exit(&[
        lui(1, 0x1001),
        lwl(8, 1, 1),
        lwr(8, 4, 1),
    ]));
    ctx.poke_bytes(DATA_BASE, &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
    ctx.run();

    assert_eq!(ctx.reg(8), 0x2233_4455);
    // lwr merges into the value lwl is still loading.
    assert_eq!(ctx.sim.stats().interlock_cycles, 1);
    assert_eq!(ctx.sim.stats().loads, 2);
}

#[test]
fn fpr_move_waits_for_commit() {
    let ctx = run_program(&with_exit(&[li(8, 0x1234), mtc1(8, 2), mfc1(9, 2)]));
    let stats = ctx.sim.stats();
    assert_eq!(ctx.sim.cpu.fregs.read(2), 0x1234);
    assert_eq!(ctx.reg(9), 0x1234);
    assert_eq!(stats.interlock_cycles, 2);
    assert_eq!(stats.fp_instructions, 2);
}

#[test]
fn shift_uses_forwarded_operand() {
    let ctx = run_program(&with_exit(&[ori(8, 0, 0x00F0), sll(9, 8, 4)]));
    assert_eq!(ctx.reg(9), 0x0F00);
}

#[test]
fn loaded_value_stored_back_after_one_interlock() {
    let mut ctx = TestContext::new().load(&with_exit(&[
        lui(1, 0x1001),
        lw(8, 0, 1),
        sw(8, 4, 1),
    ]));
    ctx.sim.cpu.memory.write_word(DATA_BASE, 0xCAFE_F00D);
    ctx.run();

    assert_eq!(ctx.sim.cpu.memory.read_word(DATA_BASE + 4), 0xCAFE_F00D);
    assert_eq!(ctx.sim.stats().interlock_cycles, 1);
}

#[test]
fn load_with_one_gap_forwards_without_interlock() {
    let mut ctx = TestContext::new().load(&with_exit(&[
        lui(1, 0x1001),
        lw(8, 0, 1),
        NOP,
        addu(9, 8, 8),
    ]));
    ctx.sim.cpu.memory.write_word(DATA_BASE, 21);
    ctx.run();

    assert_eq!(ctx.reg(9), 42);
    assert_eq!(ctx.sim.stats().interlock_cycles, 0);
}
