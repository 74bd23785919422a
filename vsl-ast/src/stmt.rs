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

use crate::expr::Expr;
use crate::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp
{
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign
}

/// An assignment target, per `spec.md` §4.4.2: a bare name, an indexed name,
/// or a swizzle. Nesting (`x[i].y`) is not part of the source grammar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LValue
{
    Name
    {
        name: String, span: Span
    },
    Index
    {
        name: String, index: Expr, span: Span
    },
    /// `name.yxz`-style swizzle; `components` is the raw letter sequence,
    /// left unvalidated here (no-repeat-on-write is an analyzer rule).
    Swizzle
    {
        name: String, components: String, span: Span
    }
}

impl LValue
{
    pub fn name(&self) -> &str
    {
        match self {
            LValue::Name { name, .. } | LValue::Index { name, .. } | LValue::Swizzle { name, .. } => name
        }
    }

    pub fn span(&self) -> Span
    {
        match self {
            LValue::Name { span, .. } | LValue::Index { span, .. } | LValue::Swizzle { span, .. } => *span
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKeyword
{
    Break,
    Continue,
    Return,
    Discard
}

/// One statement inside a stage function body (`spec.md` §4.4.2).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Statement
{
    /// `TYPE name[N];` or `TYPE name[N] = expr;`.
    VarDecl
    {
        name: String, type_name: String, array_size: u32, init: Option<Expr>, span: Span
    },
    Assign
    {
        target: LValue, op: AssignOp, value: Expr, span: Span
    },
    /// A flattened if/elif.../else chain: `branches` holds every `(condition, body)`
    /// pair in source order, `else_body` is the trailing unconditional branch.
    If
    {
        branches: Vec<(Expr, Vec<Statement>)>, else_body: Option<Vec<Statement>>, span: Span
    },
    /// `for (name: [start, end, step])`.
    For
    {
        var_name: String, start: Expr, end: Expr, step: Expr, body: Vec<Statement>, span: Span
    },
    Control
    {
        keyword: ControlKeyword, span: Span
    },
    /// A bare call expression used for its side effect (no assignment target).
    ExprStatement
    {
        expr: Expr, span: Span
    }
}

impl Statement
{
    pub fn span(&self) -> Span
    {
        match self {
            Statement::VarDecl { span, .. }
            | Statement::Assign { span, .. }
            | Statement::If { span, .. }
            | Statement::For { span, .. }
            | Statement::Control { span, .. }
            | Statement::ExprStatement { span, .. } => *span
        }
    }
}
