//! Syscall boundary: output, input, exit codes and the pipeline stall.

mod common;

use common::asm::*;
use common::{exit_seq, run_program, TestContext, DATA_BASE};
use mips_pipeline::RunOutcome;

#[test]
fn print_int_then_exit() {
    let mut words = vec![li(4, -42), li(2, 1), SYSCALL];
    words.extend_from_slice(&exit_seq());
    let ctx = run_program(&words);

    assert_eq!(ctx.output.text(), "-42");
    assert_eq!(ctx.sim.stats().syscalls, 2);
}

#[test]
fn print_string_reads_guest_memory() {
    let mut words = vec![lui(4, 0x1001), li(2, 4), SYSCALL];
    words.extend_from_slice(&exit_seq());
    let mut ctx = TestContext::new().load(&words);
    ctx.poke_bytes(DATA_BASE, b"hi\n\0");
    ctx.run();

    assert_eq!(ctx.output.text(), "hi\n");
    assert_eq!(ctx.sim.stats().syscall_loads, 4);
    assert_eq!(ctx.sim.stats().loads, 0);
}

#[test]
fn exit2_returns_guest_code() {
    let mut ctx = TestContext::new().load(&[li(4, 3), li(2, 17), SYSCALL]);
    assert_eq!(ctx.run(), RunOutcome::Exited { code: 3 });
}

#[test]
fn read_int_result_visible_to_next_instruction() {
    let mut words = vec![li(2, 5), SYSCALL, addiu(4, 2, 1), li(2, 1), SYSCALL];
    words.extend_from_slice(&exit_seq());
    let mut ctx = TestContext::with_input("41\n").load(&words);
    ctx.run();

    assert_eq!(ctx.output.text(), "42");
    assert_eq!(ctx.reg(4), 42);
}

#[test]
fn time_reports_current_cycle() {
    let mut words = vec![li(2, 30), SYSCALL];
    words.extend_from_slice(&exit_seq());
    let ctx = run_program(&words);

    // Fetched at cycle 2, the syscall retires at cycle 6.
    assert_eq!(ctx.reg(4), 6);
    assert_eq!(ctx.reg(5), 0);
}

#[test]
fn sbrk_hands_out_word_aligned_blocks() {
    let mut words = vec![
        li(4, 5),
        li(2, 9),
        SYSCALL,
        addu(16, 2, 0),
        li(4, 4),
        li(2, 9),
        SYSCALL,
        addu(17, 2, 0),
    ];
    words.extend_from_slice(&exit_seq());
    let ctx = run_program(&words);

    assert_eq!(ctx.reg(16), 0x1004_0000);
    assert_eq!(ctx.reg(17), 0x1004_0008);
}

#[test]
fn pipeline_drains_behind_syscall() {
    let mut words = vec![li(4, 7), li(2, 1), SYSCALL, li(4, 8), li(2, 1), SYSCALL];
    words.extend_from_slice(&exit_seq());
    let ctx = run_program(&words);
    let stats = ctx.sim.stats();

    // Nothing behind a syscall runs before it retires.
    assert_eq!(ctx.output.text(), "78");
    assert_eq!(stats.syscalls, 3);
    assert_eq!(stats.syscall_stall_cycles, 9);
    assert_eq!(stats.instructions, 8);
}

#[test]
fn unknown_service_is_ignored() {
    let mut words = vec![li(2, 999), SYSCALL, li(8, 1)];
    words.extend_from_slice(&exit_seq());
    let ctx = run_program(&words);

    assert_eq!(ctx.reg(8), 1);
    assert_eq!(ctx.sim.stats().syscalls, 2);
}
