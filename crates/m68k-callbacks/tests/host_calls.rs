//! The default host calls driven through the interpreter.
//!
//! Each test jumps straight to a call's address with a return address on
//! the supervisor stack, so the RTS the handler hands back lands at
//! `RETURN`.

use std::io::Write;

use m68k_callbacks::{HostCall, HostConfig, default_table};
use m68k_memory::{MemoryLayout, MemoryMap, PAGE_SIZE};
use motorola_680x0::{Access, CpuModel, Emulator, FunctionCode, Memory, Registers};

const STACK: u32 = 0x8000;
const RETURN: u32 = 0x1000;
const PATH: u32 = 0x2000;
const HEAP_BASE: u32 = 0x4000_0000;
const MEM_ERR: u32 = 0x0220;

fn machine() -> MemoryMap {
    MemoryMap::new(&MemoryLayout {
        ram_size: 0x1_0000,
        heap_size: 4 * PAGE_SIZE,
        ..MemoryLayout::default()
    })
    .unwrap()
}

fn call(
    mem: &mut MemoryMap,
    config: HostConfig,
    host_call: HostCall,
    setup: impl FnOnce(&mut Registers),
) -> Registers {
    mem.load(STACK, &RETURN.to_be_bytes()).unwrap();
    let mut emu = Emulator::with_callbacks(CpuModel::M68000, mem, default_table(config));
    let regs = emu.regs_mut();
    regs.ssp = STACK;
    regs.pc = host_call.address();
    setup(regs);
    assert!(emu.step());
    let regs = *emu.regs();
    assert_eq!(regs.pc, RETURN);
    assert_eq!(regs.ssp, STACK + 4);
    regs
}

fn load_path(mem: &mut MemoryMap, config: HostConfig, path: &[u8]) -> Registers {
    mem.load(PATH, path).unwrap();
    call(mem, config, HostCall::Load, |regs| {
        regs.a[0] = PATH;
        regs.d[0] = path.len() as u32;
    })
}

fn nul_terminated(path: &std::path::Path) -> Vec<u8> {
    let mut bytes = path.to_str().unwrap().as_bytes().to_vec();
    bytes.push(0);
    bytes
}

#[test]
fn load_reads_a_file_into_the_heap() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\x4E\x71\x4E\x75 hello").unwrap();
    file.flush().unwrap();

    let mut mem = machine();
    let regs = load_path(&mut mem, HostConfig::trusted(), &nul_terminated(file.path()));
    assert_eq!(regs.a[0], HEAP_BASE);
    assert_eq!(regs.d[0], 10);
    let bytes = mem
        .translate(regs.a[0], 10, FunctionCode::UserData, Access::Read)
        .unwrap();
    assert_eq!(bytes, b"\x4E\x71\x4E\x75 hello");
    assert_eq!(mem.heap().allocated(), u64::from(PAGE_SIZE));
}

#[test]
fn loaded_pages_are_zero_padded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0xFF; 5000]).unwrap();
    file.flush().unwrap();

    let mut mem = machine();
    let regs = load_path(&mut mem, HostConfig::trusted(), &nul_terminated(file.path()));
    assert_eq!(regs.d[0], 5000);
    assert_eq!(mem.heap().allocated(), 2 * u64::from(PAGE_SIZE));
    assert_eq!(mem.get_byte(regs.a[0] + 4999, FunctionCode::UserData), Some(0xFF));
    assert_eq!(mem.get_byte(regs.a[0] + 5000, FunctionCode::UserData), Some(0));
}

#[test]
fn empty_file_still_gets_a_page() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut mem = machine();
    let regs = load_path(&mut mem, HostConfig::trusted(), &nul_terminated(file.path()));
    assert_ne!(regs.a[0], 0);
    assert_eq!(regs.d[0], 0);
    assert_eq!(mem.heap().allocated(), u64::from(PAGE_SIZE));
}

#[test]
fn load_is_refused_without_permission() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut mem = machine();
    let regs = load_path(&mut mem, HostConfig::default(), &nul_terminated(file.path()));
    assert_eq!(regs.a[0], 0);
    assert_eq!(regs.d[1], libc::EPERM as u32);
    assert_eq!(mem.heap().allocated(), 0);
}

#[test]
fn path_must_end_in_nul() {
    let mut mem = machine();
    let regs = load_path(&mut mem, HostConfig::trusted(), b"/tmp");
    assert_eq!(regs.a[0], 0);
    assert_eq!(regs.d[1], libc::EINVAL as u32);

    let regs = load_path(&mut mem, HostConfig::trusted(), b"\0");
    assert_eq!(regs.a[0], 0);
    assert_eq!(regs.d[1], libc::EINVAL as u32);
}

#[test]
fn path_stops_at_the_first_nul() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"prefix").unwrap();
    file.flush().unwrap();

    let mut path = nul_terminated(file.path());
    path.extend_from_slice(b"junk\0");
    let mut mem = machine();
    let regs = load_path(&mut mem, HostConfig::trusted(), &path);
    assert_eq!(regs.a[0], HEAP_BASE);
    assert_eq!(regs.d[0], 6);
    let bytes = mem
        .translate(regs.a[0], 6, FunctionCode::UserData, Access::Read)
        .unwrap();
    assert_eq!(bytes, b"prefix");
}

#[test]
fn load_into_an_exhausted_heap_reports_enomem() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![0x5A; 5 * PAGE_SIZE as usize]).unwrap();
    file.flush().unwrap();

    let mut mem = machine();
    let regs = load_path(&mut mem, HostConfig::trusted(), &nul_terminated(file.path()));
    assert_eq!(regs.a[0], 0);
    assert_eq!(regs.d[1], libc::ENOMEM as u32);
    assert_eq!(mem.heap().allocated(), 0);
}

#[test]
fn missing_file_reports_enoent() {
    let dir = tempfile::tempdir().unwrap();
    let mut mem = machine();
    let path = nul_terminated(&dir.path().join("missing"));
    let regs = load_path(&mut mem, HostConfig::trusted(), &path);
    assert_eq!(regs.a[0], 0);
    assert_eq!(regs.d[1], libc::ENOENT as u32);
}

#[test]
fn path_in_supervisor_memory_is_a_fault() {
    let mut mem = machine();
    mem.load(0x100, b"/etc/hostname\0").unwrap();
    let regs = call(&mut mem, HostConfig::trusted(), HostCall::Load, |regs| {
        regs.a[0] = 0x100;
        regs.d[0] = 14;
    });
    assert_eq!(regs.a[0], 0);
    assert_eq!(regs.d[1], libc::EFAULT as u32);
}

#[test]
fn new_ptr_and_dispose_ptr() {
    let mut mem = machine();
    let regs = call(&mut mem, HostConfig::default(), HostCall::NewPtr, |regs| {
        regs.d[0] = 100;
    });
    let block = regs.a[0];
    assert_eq!(block, HEAP_BASE);
    assert_eq!(mem.heap().allocated(), u64::from(PAGE_SIZE));
    mem.put_long(block + 96, 0x1234_5678, FunctionCode::UserData).unwrap();

    call(&mut mem, HostConfig::default(), HostCall::DisposePtr, |regs| {
        regs.a[0] = block;
    });
    assert_eq!(mem.heap().allocated(), 0);
    assert!(mem.get_long(block, FunctionCode::UserData).is_none());
}

#[test]
fn exhausted_heap_sets_mem_err() {
    let mut mem = machine();
    let regs = call(&mut mem, HostConfig::default(), HostCall::NewPtr, |regs| {
        regs.d[0] = 5 * PAGE_SIZE;
        regs.a[0] = 0xDEAD;
    });
    assert_eq!(regs.a[0], 0);
    assert_eq!(
        mem.get_word(MEM_ERR, FunctionCode::SupervisorData),
        Some(-108i16 as u16)
    );
}

#[test]
fn block_move_copies_and_logs_the_update() {
    let mut mem = machine();
    mem.load(0x2000, b"ABCDEFGH").unwrap();
    let regs = call(&mut mem, HostConfig::default(), HostCall::BlockMove, |regs| {
        regs.a[0] = 0x2000;
        regs.a[1] = 0x3000;
        regs.d[0] = 8;
    });
    assert_eq!(regs.d[0], 0);
    let copied = mem
        .translate(0x3000, 8, FunctionCode::UserData, Access::Read)
        .unwrap();
    assert_eq!(copied, b"ABCDEFGH");
    assert_eq!(mem.take_updates(), vec![0x3000..0x3008]);
}

#[test]
fn block_move_into_the_vector_table_is_a_param_err() {
    let mut mem = machine();
    mem.load(0x2000, &[0xAA; 4]).unwrap();
    let regs = call(&mut mem, HostConfig::default(), HostCall::BlockMove, |regs| {
        regs.a[0] = 0x2000;
        regs.a[1] = 0x0008;
        regs.d[0] = 4;
    });
    assert_eq!(regs.d[0] as i32, -50);
    assert_eq!(mem.get_long(8, FunctionCode::SupervisorData), Some(0));
    assert!(mem.take_updates().is_empty());
}

#[test]
fn gestalt_identifies_the_emulator() {
    let mut mem = machine();
    let regs = call(&mut mem, HostConfig::default(), HostCall::Gestalt, |regs| {
        regs.d[0] = u32::from_be_bytes(*b"v68k");
    });
    assert_eq!(regs.d[0], 0);

    let regs = call(&mut mem, HostConfig::default(), HostCall::Gestalt, |regs| {
        regs.d[0] = u32::from_be_bytes(*b"proc");
    });
    assert_eq!(regs.d[0], 0);
    assert_eq!(regs.a[0], CpuModel::M68000.gestalt_processor_type());
}

#[test]
fn no_op_only_returns() {
    let mut mem = machine();
    let mut before = Registers::new();
    let regs = call(&mut mem, HostConfig::default(), HostCall::NoOp, |regs| {
        regs.d[3] = 0x55;
        regs.a[2] = 0x66;
        before = *regs;
    });
    assert_eq!(regs.d, before.d);
    assert_eq!(regs.a, before.a);
    assert_eq!(regs.sr, before.sr);
}

#[test]
fn empty_slot_halts() {
    let mut mem = machine();
    let mut emu = Emulator::with_callbacks(CpuModel::M68000, &mut mem, default_table(HostConfig::default()));
    emu.regs_mut().pc = motorola_680x0::callback_address(100).unwrap();
    assert!(!emu.step());
    assert_eq!(emu.condition(), motorola_680x0::Condition::Halted);
}

/// Terminal handlers end the process, so they run in a re-executed copy of
/// this test binary.
#[cfg(unix)]
mod termination {
    use std::os::unix::process::ExitStatusExt;
    use std::process::{Command, Output};

    use m68k_callbacks::{HostCall, HostConfig, default_table, install_default_vectors};
    use motorola_680x0::{CpuModel, Emulator};

    use super::{STACK, machine};

    const CHILD: &str = "M68K_CALLBACKS_TERMINATION_CHILD";

    fn in_child() -> bool {
        std::env::var_os(CHILD).is_some()
    }

    fn run_child(test: &str) -> Output {
        Command::new(std::env::current_exe().unwrap())
            .args([test, "--exact", "--nocapture", "--test-threads=1"])
            .env(CHILD, "1")
            .output()
            .unwrap()
    }

    #[test]
    fn call_zero_aborts() {
        if in_child() {
            let mut mem = machine();
            let mut emu = Emulator::with_callbacks(
                CpuModel::M68000,
                &mut mem,
                default_table(HostConfig::default()),
            );
            emu.regs_mut().pc = HostCall::Unimplemented.address();
            emu.step();
            panic!("call 0 returned");
        }
        let output = run_child("termination::call_zero_aborts");
        assert_eq!(output.status.signal(), Some(libc::SIGABRT));
    }

    #[test]
    fn illegal_instruction_raises_sigill() {
        if in_child() {
            let mut mem = machine();
            install_default_vectors(&mut mem, 0).unwrap();
            mem.load_words(0x1000, &[0x4AFC]).unwrap();
            let mut emu = Emulator::with_callbacks(
                CpuModel::M68000,
                &mut mem,
                default_table(HostConfig::default()),
            );
            let regs = emu.regs_mut();
            regs.pc = 0x1000;
            regs.ssp = STACK;
            emu.run(4);
            panic!("illegal instruction handler returned");
        }
        let output = run_child("termination::illegal_instruction_raises_sigill");
        assert_eq!(output.status.signal(), Some(libc::SIGILL));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("v68k: exception: Illegal Instruction"), "{stderr}");
    }

    #[test]
    fn zero_divide_raises_sigfpe() {
        if in_child() {
            let mut mem = machine();
            install_default_vectors(&mut mem, 0).unwrap();
            // DIVU.W D1,D0 with D1 = 0
            mem.load_words(0x1000, &[0x80C1]).unwrap();
            let mut emu = Emulator::with_callbacks(
                CpuModel::M68000,
                &mut mem,
                default_table(HostConfig::default()),
            );
            let regs = emu.regs_mut();
            regs.pc = 0x1000;
            regs.ssp = STACK;
            emu.run(4);
            panic!("division handler returned");
        }
        let output = run_child("termination::zero_divide_raises_sigfpe");
        assert_eq!(output.status.signal(), Some(libc::SIGFPE));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("v68k: exception: Division By Zero"), "{stderr}");
    }
}
