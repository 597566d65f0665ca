//! Running the interpreter on a `MemoryMap`.

use m68k_memory::{MemoryLayout, MemoryMap, Protection};
use motorola_680x0::{CpuModel, Emulator, FunctionCode, Memory};

const CODE: u32 = 0x1000;
const BUS_ERROR_HANDLER: u32 = 0x0800;

fn machine(program: &[u16]) -> MemoryMap {
    let mut mem = MemoryMap::new(&MemoryLayout {
        ram_size: 0x1_0000,
        ..MemoryLayout::default()
    })
    .unwrap();
    mem.load(2 * 4, &BUS_ERROR_HANDLER.to_be_bytes()).unwrap();
    mem.load_words(BUS_ERROR_HANDLER, &[0x4E71]).unwrap();
    mem.load_words(CODE, program).unwrap();
    mem
}

#[test]
fn user_code_cannot_patch_the_vector_table() {
    // MOVE.L D0,$0008.W
    let mut mem = machine(&[0x21C0, 0x0008]);
    {
        let mut emu = Emulator::new(CpuModel::M68000, &mut mem);
        let regs = emu.regs_mut();
        regs.pc = CODE;
        regs.sr = 0;
        regs.usp = 0x8000;
        regs.ssp = 0xF000;
        regs.d[0] = 0xDEAD_BEEF;
        assert!(emu.step());
        assert_eq!(emu.regs().pc, BUS_ERROR_HANDLER);
        assert!(emu.regs().is_supervisor());
    }
    assert_eq!(
        mem.get_long(8, FunctionCode::SupervisorData),
        Some(BUS_ERROR_HANDLER)
    );
}

#[test]
fn supervisor_code_writes_through() {
    let mut mem = machine(&[0x21C0, 0x0100]); // MOVE.L D0,$0100.W
    {
        let mut emu = Emulator::new(CpuModel::M68000, &mut mem);
        let regs = emu.regs_mut();
        regs.pc = CODE;
        regs.ssp = 0xF000;
        regs.d[0] = 0x1234_5678;
        assert!(emu.step());
        assert_eq!(emu.regs().pc, CODE + 4);
    }
    assert_eq!(
        mem.get_long(0x100, FunctionCode::SupervisorData),
        Some(0x1234_5678)
    );
}

#[test]
fn data_only_region_cannot_be_executed() {
    let mut mem = machine(&[]);
    mem.map(0x2_0000, vec![0x4E; 0x100], Protection::DATA).unwrap();
    let mut emu = Emulator::new(CpuModel::M68000, &mut mem);
    let regs = emu.regs_mut();
    regs.pc = 0x2_0000;
    regs.ssp = 0xF000;
    assert!(emu.step());
    assert_eq!(emu.regs().pc, BUS_ERROR_HANDLER);
}

#[test]
fn heap_memory_runs_code() {
    let mut mem = machine(&[]);
    let addr = mem.allocator().unwrap().allocate(16).unwrap();
    mem.load_words(addr, &[0x702A]).unwrap(); // MOVEQ #42,D0
    let mut emu = Emulator::new(CpuModel::M68020, &mut mem);
    let regs = emu.regs_mut();
    regs.pc = addr;
    regs.sr = 0;
    regs.usp = 0x8000;
    assert!(emu.step());
    assert_eq!(emu.regs().d[0], 42);
}
