// Copyright (c) 2021, BlockProject 3D
//
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without modification,
// are permitted provided that the following conditions are met:
//
//     * Redistributions of source code must retain the above copyright notice,
//       this list of conditions and the following disclaimer.
//     * Redistributions in binary form must reproduce the above copyright notice,
//       this list of conditions and the following disclaimer in the documentation
//       and/or other materials provided with the distribution.
//     * Neither the name of BlockProject 3D nor the names of its contributors
//       may be used to endorse or promote products derived from this software
//       without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT OWNER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF
// LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING
// NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS
// SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Accumulates the GLSL statements of a single stage entry point's body
//! (`spec.md` §4.5): a textual buffer the analyzer appends to as a side
//! effect of validating each statement.

use std::collections::HashSet;
use std::fmt::Write as _;

use vsl_ast::ControlKeyword;

/// GLSL type name used in declarations/casts; the generator only ever needs
/// the textual spelling, never the resolved `TypeId` itself.
pub type GlslTypeName = String;

pub struct FuncGenerator
{
    buffer: String,
    indent_level: u32,
    uid: u32,
    binding_emit_mask: HashSet<u32>
}

impl Default for FuncGenerator
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl FuncGenerator
{
    pub fn new() -> Self
    {
        FuncGenerator { buffer: String::new(), indent_level: 0, uid: 0, binding_emit_mask: HashSet::new() }
    }

    fn indent(&mut self)
    {
        for _ in 0..self.indent_level {
            self.buffer.push_str("    ");
        }
    }

    pub fn emit_decl(&mut self, ty: &str, name: &str)
    {
        self.indent();
        let _ = writeln!(self.buffer, "{} {};", ty, name);
    }

    pub fn emit_def(&mut self, ty: &str, name: &str, value: &str)
    {
        self.indent();
        let _ = writeln!(self.buffer, "{} {} = {};", ty, name, value);
    }

    pub fn emit_assign(&mut self, lvalue: &str, op: &str, value: &str)
    {
        self.indent();
        let _ = writeln!(self.buffer, "{} {} {};", lvalue, op, value);
    }

    /// Materializes a subexpression into a fresh `_t<N>` local, returning
    /// the name it can be referenced by; used so side effects of a
    /// subexpression are evaluated exactly once.
    pub fn emit_temp(&mut self, ty: &str, value: &str) -> String
    {
        let name = format!("_t{}", self.uid);
        self.uid += 1;
        self.emit_def(ty, &name, value);
        name
    }

    pub fn emit_image_store(&mut self, store_ref: &str, value: &str)
    {
        self.indent();
        let _ = writeln!(self.buffer, "imageStore({}, {});", store_ref, value);
    }

    /// A bare call expression kept only for its side effect.
    pub fn emit_expr_statement(&mut self, expr: &str)
    {
        self.indent();
        let _ = writeln!(self.buffer, "{};", expr);
    }

    pub fn emit_if(&mut self, cond: &str)
    {
        self.indent();
        let _ = writeln!(self.buffer, "if ({}) {{", cond);
        self.indent_level += 1;
    }

    pub fn emit_elif(&mut self, cond: &str)
    {
        self.indent_level -= 1;
        self.indent();
        let _ = writeln!(self.buffer, "}} else if ({}) {{", cond);
        self.indent_level += 1;
    }

    pub fn emit_else(&mut self)
    {
        self.indent_level -= 1;
        self.indent();
        self.buffer.push_str("} else {\n");
        self.indent_level += 1;
    }

    pub fn emit_for(&mut self, name: &str, start: &str, end: &str, step: &str)
    {
        self.indent();
        let _ = writeln!(self.buffer, "for (int {name} = {start}; {name} < {end}; {name} += {step}) {{");
        self.indent_level += 1;
    }

    pub fn close_block(&mut self)
    {
        self.indent_level -= 1;
        self.indent();
        self.buffer.push_str("}\n");
    }

    pub fn emit_control(&mut self, keyword: ControlKeyword)
    {
        self.indent();
        let text = match keyword {
            ControlKeyword::Break => "break;",
            ControlKeyword::Continue => "continue;",
            ControlKeyword::Return => "return;",
            ControlKeyword::Discard => "discard;"
        };
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Emits `const uint _b<i> = <load from the push-constant indirection
    /// table>;` exactly once per function, the first time binding `i` is
    /// referenced (`spec.md` §4.5).
    pub fn emit_binding_index(&mut self, i: u32)
    {
        if self.binding_emit_mask.insert(i) {
            self.indent();
            let _ = writeln!(self.buffer, "const uint _b{i} = _BindIndices.slot{i};");
        }
    }

    pub fn finish(self) -> String
    {
        self.buffer
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn if_else_balances_indentation()
    {
        let mut gen = FuncGenerator::new();
        gen.emit_if("x > 0");
        gen.emit_def("float", "y", "1.0");
        gen.emit_else();
        gen.emit_def("float", "y", "2.0");
        gen.close_block();
        let out = gen.finish();
        assert!(out.contains("if (x > 0) {"));
        assert!(out.contains("} else {"));
        assert_eq!(out.lines().filter(|l| l.trim() == "float y = 2.0;").count(), 1);
    }

    #[test]
    fn binding_index_emitted_once()
    {
        let mut gen = FuncGenerator::new();
        gen.emit_binding_index(3);
        gen.emit_binding_index(3);
        let out = gen.finish();
        assert_eq!(out.matches("_b3").count(), 1);
    }

    #[test]
    fn temp_names_are_unique()
    {
        let mut gen = FuncGenerator::new();
        let a = gen.emit_temp("float", "1.0");
        let b = gen.emit_temp("float", "2.0");
        assert_ne!(a, b);
    }
}
