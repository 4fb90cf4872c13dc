//! Chunk disassembler.
//!
//! A read-only debug view: renders one instruction per line as
//! `OFFS LINE NAME OPERAND(S) 'constant'`, with `|` in the line column when
//! the source line repeats. Output is returned as a `String` so tests and
//! the CLI's `--dump` mode can both consume it.

use std::fmt::Write;

use crate::chunk::{Chunk, Op};
use crate::object::ObjFunction;
use crate::value::Value;

/// Disassemble a function and, recursively, every function nested in its
/// constant pool.
pub fn disassemble(function: &ObjFunction) -> String {
    let mut out = String::new();
    disassemble_into(function, &mut out);
    out
}

fn disassemble_into(function: &ObjFunction, out: &mut String) {
    let name = match &function.name {
        Some(name) => name.chars.to_string(),
        None => "script".to_string(),
    };
    out.push_str(&disassemble_chunk(&function.chunk, &name));
    for constant in &function.chunk.constants {
        if let Value::Function(nested) = constant {
            disassemble_into(nested, out);
        }
    }
}

/// Disassemble a single chunk under a `== name ==` header.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", name);
    let mut offset = 0;
    while offset < chunk.code.len() {
        offset = disassemble_instruction(chunk, offset, &mut out);
    }
    out
}

/// Render the instruction at `offset`; returns the offset of the next one.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{:04} ", offset);
    let line = chunk.line_of(offset);
    if offset > 0 && line == chunk.line_of(offset - 1) {
        out.push_str("   | ");
    } else {
        let _ = write!(out, "{:4} ", line);
    }

    let Some(op) = Op::from_byte(chunk.code[offset]) else {
        let _ = writeln!(out, "UNKNOWN {:#04x}", chunk.code[offset]);
        return offset + 1;
    };
    let name = op_name(op);

    match op {
        Op::Nil
        | Op::True
        | Op::False
        | Op::Pop
        | Op::CloseUpvalue
        | Op::Equal
        | Op::Greater
        | Op::Less
        | Op::Negate
        | Op::Not
        | Op::Add
        | Op::Sub
        | Op::Mul
        | Op::Div
        | Op::Print
        | Op::Return => {
            let _ = writeln!(out, "{}", name);
            offset + 1
        }

        Op::LoadConst | Op::DefGlobal | Op::GetGlobal | Op::SetGlobal => {
            let index = chunk.code[offset + 1] as usize;
            let _ = writeln!(out, "{:<16} {:4} '{}'", name, index, chunk.constants[index]);
            offset + 2
        }

        Op::LoadConstLong | Op::DefGlobalLong | Op::GetGlobalLong | Op::SetGlobalLong => {
            let index = chunk.read_u24(offset + 1);
            let _ = writeln!(out, "{:<16} {:4} '{}'", name, index, chunk.constants[index]);
            offset + 4
        }

        Op::GetLocal | Op::SetLocal | Op::GetUpvalue | Op::SetUpvalue | Op::Call => {
            let slot = chunk.code[offset + 1];
            let _ = writeln!(out, "{:<16} {:4}", name, slot);
            offset + 2
        }

        Op::GetLocalLong | Op::SetLocalLong => {
            let slot = chunk.read_u24(offset + 1);
            let _ = writeln!(out, "{:<16} {:4}", name, slot);
            offset + 4
        }

        Op::Jump | Op::JumpIfFalse => {
            let jump = chunk.read_u16(offset + 1) as usize;
            let target = offset + 3 + jump;
            let _ = writeln!(out, "{:<16} {:4} -> {}", name, offset, target);
            offset + 3
        }

        Op::Loop => {
            let jump = chunk.read_u16(offset + 1) as usize;
            let target = offset + 3 - jump;
            let _ = writeln!(out, "{:<16} {:4} -> {}", name, offset, target);
            offset + 3
        }

        Op::Closure => {
            let index = chunk.code[offset + 1] as usize;
            let _ = writeln!(out, "{:<16} {:4} '{}'", name, index, chunk.constants[index]);
            let mut offset = offset + 2;
            if let Value::Function(function) = &chunk.constants[index] {
                for _ in 0..function.upvalue_count {
                    let is_local = chunk.code[offset] != 0;
                    let capture = chunk.code[offset + 1];
                    let _ = writeln!(
                        out,
                        "{:04}      |                     {} {}",
                        offset,
                        if is_local { "local" } else { "upvalue" },
                        capture
                    );
                    offset += 2;
                }
            }
            offset
        }
    }
}

fn op_name(op: Op) -> &'static str {
    match op {
        Op::LoadConst => "LOAD_CONST",
        Op::LoadConstLong => "LOAD_CONST_LONG",
        Op::Nil => "NIL",
        Op::True => "TRUE",
        Op::False => "FALSE",
        Op::Pop => "POP",
        Op::GetLocal => "GET_LOCAL",
        Op::GetLocalLong => "GET_LOCAL_LONG",
        Op::SetLocal => "SET_LOCAL",
        Op::SetLocalLong => "SET_LOCAL_LONG",
        Op::DefGlobal => "DEF_GLOBAL",
        Op::DefGlobalLong => "DEF_GLOBAL_LONG",
        Op::GetGlobal => "GET_GLOBAL",
        Op::GetGlobalLong => "GET_GLOBAL_LONG",
        Op::SetGlobal => "SET_GLOBAL",
        Op::SetGlobalLong => "SET_GLOBAL_LONG",
        Op::GetUpvalue => "GET_UPVALUE",
        Op::SetUpvalue => "SET_UPVALUE",
        Op::CloseUpvalue => "CLOSE_UPVALUE",
        Op::Equal => "EQUAL",
        Op::Greater => "GREATER",
        Op::Less => "LESS",
        Op::Negate => "NEGATE",
        Op::Not => "NOT",
        Op::Add => "ADD",
        Op::Sub => "SUB",
        Op::Mul => "MUL",
        Op::Div => "DIV",
        Op::Print => "PRINT",
        Op::Jump => "JUMP",
        Op::JumpIfFalse => "JUMP_IF_FALSE",
        Op::Loop => "LOOP",
        Op::Call => "CALL",
        Op::Closure => "CLOSURE",
        Op::Return => "RETURN",
    }
}
