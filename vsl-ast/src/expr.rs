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

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A literal atom, already classified by the parser per `spec.md` §4.4.3:
/// unsigned unless a leading `-` was lexed, float only with a `.`/exponent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue
{
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp
{
    Neg,
    Not,
    BitNot
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp
{
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    LogicalAnd,
    LogicalOr
}

/// A syntax-tree expression node, as the external parser is assumed to
/// deliver it (`spec.md` §1's "we assume an external parser delivers a
/// typed syntax tree whose node shapes §4.3 enumerates"). Resolution of
/// `Name`/`Call`/type references against the type system is entirely the
/// analyzer's job; this tree carries only raw source-level structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr
{
    Literal
    {
        value: LiteralValue, span: Span
    },
    /// A bare identifier: a variable name, or a type name used as a
    /// zero-argument constructor is still routed through `Call`.
    Name
    {
        name: String, span: Span
    },
    Unary
    {
        op: UnaryOp, operand: Box<Expr>, span: Span
    },
    Binary
    {
        op: BinaryOp, left: Box<Expr>, right: Box<Expr>, span: Span
    },
    Ternary
    {
        cond: Box<Expr>, then_value: Box<Expr>, else_value: Box<Expr>, span: Span
    },
    /// `base[index]`.
    Index
    {
        base: Box<Expr>, index: Box<Expr>, span: Span
    },
    /// `base.member`: either a struct field access or a vector swizzle; the
    /// analyzer disambiguates using the resolved type of `base`.
    Member
    {
        base: Box<Expr>, member: String, span: Span
    },
    /// `name(args...)`: either a type constructor (`vec3(...)`, a struct
    /// name) or a function call, resolved via the operator/function tables.
    Call
    {
        name: String, args: Vec<Expr>, span: Span
    }
}

impl Expr
{
    pub fn span(&self) -> Span
    {
        match self {
            Expr::Literal { span, .. }
            | Expr::Name { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Index { span, .. }
            | Expr::Member { span, .. }
            | Expr::Call { span, .. } => *span
        }
    }
}
