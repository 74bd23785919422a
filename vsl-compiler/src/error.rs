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

use thiserror::Error;
use vsl_ast::Span;

/// What part of the pipeline raised a [`ShaderError`]; carried as data
/// instead of as a string prefix or a distinct error type per kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderErrorKind
{
    Syntax,
    Type,
    Scope,
    Operator,
    Function,
    Binding,
    Limit,
    Control,
    Internal
}

/// The single error carrier for every phase (`spec.md` §7): analysis raises
/// one of these and unwinds to the orchestrator, which latches it and halts.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind:?} error at {}:{}: {message}", span.line, span.column)]
pub struct ShaderError
{
    pub message: String,
    pub span: Span,
    pub bad_text: String,
    pub kind: ShaderErrorKind
}

impl ShaderError
{
    pub fn new(kind: ShaderErrorKind, span: Span, bad_text: impl Into<String>, message: impl Into<String>) -> Self
    {
        ShaderError { message: message.into(), span, bad_text: bad_text.into(), kind }
    }

    /// For diagnostics with no source position, such as a SPIR-V back-end
    /// failure (`spec.md` §4.7): always `ShaderErrorKind::Internal`.
    pub fn internal(message: impl Into<String>) -> Self
    {
        ShaderError { message: message.into(), span: Span::default(), bad_text: String::new(), kind: ShaderErrorKind::Internal }
    }
}

pub type Result<T> = std::result::Result<T, ShaderError>;
