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

//! Overload tables for built-in operators and functions (`spec.md` §4.3).
//! Entries are plain data over [`BaseType`]/[`GenericFamily`], never over a
//! concrete [`vsl_types::TypeId`], so the tables are ordinary `&'static`
//! slices needing no lazy initialization guard: `rustc` places them in
//! read-only static storage, which is the zero-cost form of the teacher's
//! once-initialized globals (`TypeList::Initialize()` in the original) for
//! data that carries no registry-dependent handle.

use thiserror::Error;
use vsl_types::{BaseType, TypeId, TypeRegistry};

/// The four generic placeholder families from `spec.md` §9 glossary:
/// `genType` (float/vec2/vec3/vec4), `genIType`, `genUType`, `genBType`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenericFamily
{
    GenType,
    GenIType,
    GenUType,
    GenBType
}

impl GenericFamily
{
    fn accepts(self, base: BaseType) -> bool
    {
        match self {
            GenericFamily::GenType => base == BaseType::Float,
            GenericFamily::GenIType => base == BaseType::Signed,
            GenericFamily::GenUType => base == BaseType::Unsigned,
            GenericFamily::GenBType => base == BaseType::Boolean
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamKind
{
    Generic(GenericFamily),
    /// An exact scalar of this base type, with one-step implicit casts
    /// allowed per `spec.md` §4.3's cast lattice.
    Scalar(BaseType)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec
{
    pub kind: ParamKind,
    pub is_ref: bool
}

const fn generic(family: GenericFamily) -> ParamSpec
{
    ParamSpec { kind: ParamKind::Generic(family), is_ref: false }
}

const fn scalar(base: BaseType) -> ParamSpec
{
    ParamSpec { kind: ParamKind::Scalar(base), is_ref: false }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResultSpec
{
    /// Same type (including array-less vecDims/matCols) as parameter N.
    SameAsParam(usize),
    Scalar(BaseType)
}

/// One overload: a name shared by every operator spelling that dispatches
/// to it (`$op` in `gen_string` substitutes the concrete operator token),
/// or a unique function name.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entry
{
    pub name: &'static str,
    pub params: &'static [ParamSpec],
    pub result: ResultSpec,
    /// Emission template with `$1..$N` argument placeholders and an
    /// optional `$op` operator-token placeholder.
    pub gen_string: &'static str
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OpError
{
    #[error("no overload of '{0}' matches the given argument types")]
    NoMatch(String),
    #[error("call to '{0}' is ambiguous between multiple overloads")]
    Ambiguous(String)
}

/// One step of `spec.md` §4.3's implicit cast lattice: `Signed -> Float`,
/// `Unsigned -> Float` always; `Unsigned -> Signed` only when the argument
/// is an integer literal (range-checked by the caller, not here).
pub fn implicit_cast_cost(from: BaseType, to: BaseType, is_literal: bool) -> Option<u32>
{
    if from == to {
        return Some(0);
    }
    match (from, to) {
        (BaseType::Signed, BaseType::Float) | (BaseType::Unsigned, BaseType::Float) => Some(1),
        (BaseType::Unsigned, BaseType::Signed) if is_literal => Some(1),
        _ => None
    }
}

struct Candidate<'a>
{
    entry: &'a Entry,
    cost: u32
}

/// Overload resolution (`spec.md` §4.3): every parameter of `entry` must
/// match the corresponding argument, generic parameters in the same family
/// must all agree on `vecDims`, and the unique match with fewest implicit
/// casts wins; a tie is an ambiguity error.
pub fn resolve<'a>(entries: &'a [Entry], name: &str, arg_types: &[TypeId], arg_is_literal: &[bool], registry: &TypeRegistry) -> Result<&'a Entry, OpError>
{
    let mut candidates: Vec<Candidate<'a>> = Vec::new();
    'entries: for entry in entries.iter().filter(|e| e.name == name) {
        if entry.params.len() != arg_types.len() {
            continue;
        }
        let mut cost = 0u32;
        let mut generic_dims: Option<u8> = None;
        for (i, param) in entry.params.iter().enumerate() {
            let arg_ty = registry.resolve(arg_types[i]);
            match param.kind {
                ParamKind::Generic(family) => {
                    if !family.accepts(arg_ty.base_type) {
                        continue 'entries;
                    }
                    let numeric = match arg_ty.numeric() {
                        Some(n) if n.mat_cols == 1 => n,
                        _ => continue 'entries
                    };
                    match generic_dims {
                        None => generic_dims = Some(numeric.vec_dims),
                        Some(d) if d == numeric.vec_dims => {},
                        Some(_) => continue 'entries
                    }
                },
                ParamKind::Scalar(base) => {
                    match arg_ty.numeric() {
                        Some(n) if n.mat_cols == 1 && n.vec_dims == 1 => {},
                        _ => continue 'entries
                    }
                    match implicit_cast_cost(arg_ty.base_type, base, arg_is_literal.get(i).copied().unwrap_or(false)) {
                        Some(c) => cost += c,
                        None => continue 'entries
                    }
                }
            }
        }
        candidates.push(Candidate { entry, cost });
    }

    if candidates.is_empty() {
        return Err(OpError::NoMatch(name.to_string()));
    }
    let min_cost = candidates.iter().map(|c| c.cost).min().unwrap();
    let mut best: Vec<&Entry> = candidates.iter().filter(|c| c.cost == min_cost).map(|c| c.entry).collect();
    if best.len() > 1 {
        return Err(OpError::Ambiguous(name.to_string()));
    }
    Ok(best.remove(0))
}

/// Resolves an [`Entry`]'s declared result type against the actual argument
/// types chosen for a call.
pub fn result_type(entry: &Entry, arg_types: &[TypeId], registry: &TypeRegistry) -> TypeId
{
    match entry.result {
        ResultSpec::SameAsParam(i) => arg_types[i],
        ResultSpec::Scalar(base) => {
            let name = match base {
                BaseType::Boolean => "bool",
                BaseType::Signed => "int",
                BaseType::Unsigned => "uint",
                BaseType::Float => "float",
                _ => unreachable!("scalar result bases are limited to the four numeric/boolean kinds")
            };
            registry.get_builtin(name).expect("scalar result builtin is always registered")
        }
    }
}

use GenericFamily::{GenBType, GenIType, GenType, GenUType};

pub static ARITHMETIC_OPERATORS: &[Entry] = &[
    Entry { name: "add", params: &[generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "add", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "add", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "sub", params: &[generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "sub", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "sub", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "mul", params: &[generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "mul", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "mul", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "div", params: &[generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "div", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "div", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 $op $2)" },
    Entry { name: "mod", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 % $2)" },
    Entry { name: "mod", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 % $2)" },
    Entry { name: "neg", params: &[generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "(-$1)" },
    Entry { name: "neg", params: &[generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "(-$1)" },
    Entry { name: "not", params: &[generic(GenBType)], result: ResultSpec::SameAsParam(0), gen_string: "(!$1)" },
];

pub static BITWISE_OPERATORS: &[Entry] = &[
    Entry { name: "bitand", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 & $2)" },
    Entry { name: "bitand", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 & $2)" },
    Entry { name: "bitor", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 | $2)" },
    Entry { name: "bitor", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 | $2)" },
    Entry { name: "bitxor", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 ^ $2)" },
    Entry { name: "bitxor", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "($1 ^ $2)" },
    Entry { name: "bitnot", params: &[generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "(~$1)" },
    Entry { name: "bitnot", params: &[generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "(~$1)" },
    Entry { name: "shl", params: &[generic(GenIType), scalar(BaseType::Unsigned)], result: ResultSpec::SameAsParam(0), gen_string: "($1 << $2)" },
    Entry { name: "shl", params: &[generic(GenUType), scalar(BaseType::Unsigned)], result: ResultSpec::SameAsParam(0), gen_string: "($1 << $2)" },
    Entry { name: "shr", params: &[generic(GenIType), scalar(BaseType::Unsigned)], result: ResultSpec::SameAsParam(0), gen_string: "($1 >> $2)" },
    Entry { name: "shr", params: &[generic(GenUType), scalar(BaseType::Unsigned)], result: ResultSpec::SameAsParam(0), gen_string: "($1 >> $2)" },
];

pub static RELATIONAL_OPERATORS: &[Entry] = &[
    Entry { name: "lt", params: &[scalar(BaseType::Float), scalar(BaseType::Float)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "lt", params: &[scalar(BaseType::Signed), scalar(BaseType::Signed)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "lt", params: &[scalar(BaseType::Unsigned), scalar(BaseType::Unsigned)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "le", params: &[scalar(BaseType::Float), scalar(BaseType::Float)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "le", params: &[scalar(BaseType::Signed), scalar(BaseType::Signed)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "le", params: &[scalar(BaseType::Unsigned), scalar(BaseType::Unsigned)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "gt", params: &[scalar(BaseType::Float), scalar(BaseType::Float)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "gt", params: &[scalar(BaseType::Signed), scalar(BaseType::Signed)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "gt", params: &[scalar(BaseType::Unsigned), scalar(BaseType::Unsigned)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "ge", params: &[scalar(BaseType::Float), scalar(BaseType::Float)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "ge", params: &[scalar(BaseType::Signed), scalar(BaseType::Signed)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "ge", params: &[scalar(BaseType::Unsigned), scalar(BaseType::Unsigned)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "eq", params: &[generic(GenType), generic(GenType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "eq", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "eq", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "eq", params: &[generic(GenBType), generic(GenBType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "ne", params: &[generic(GenType), generic(GenType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "ne", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "ne", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
    Entry { name: "ne", params: &[generic(GenBType), generic(GenBType)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 $op $2)" },
];

pub static LOGICAL_OPERATORS: &[Entry] = &[
    Entry { name: "logand", params: &[scalar(BaseType::Boolean), scalar(BaseType::Boolean)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 && $2)" },
    Entry { name: "logor", params: &[scalar(BaseType::Boolean), scalar(BaseType::Boolean)], result: ResultSpec::Scalar(BaseType::Boolean), gen_string: "($1 || $2)" },
];

pub static BUILTIN_FUNCTIONS: &[Entry] = &[
    Entry { name: "dot", params: &[generic(GenType), generic(GenType)], result: ResultSpec::Scalar(BaseType::Float), gen_string: "dot($1, $2)" },
    Entry { name: "cross", params: &[generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "cross($1, $2)" },
    Entry { name: "length", params: &[generic(GenType)], result: ResultSpec::Scalar(BaseType::Float), gen_string: "length($1)" },
    Entry { name: "normalize", params: &[generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "normalize($1)" },
    Entry { name: "max", params: &[generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "max($1, $2)" },
    Entry { name: "max", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "max($1, $2)" },
    Entry { name: "max", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "max($1, $2)" },
    Entry { name: "min", params: &[generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "min($1, $2)" },
    Entry { name: "min", params: &[generic(GenIType), generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "min($1, $2)" },
    Entry { name: "min", params: &[generic(GenUType), generic(GenUType)], result: ResultSpec::SameAsParam(0), gen_string: "min($1, $2)" },
    Entry { name: "clamp", params: &[generic(GenType), generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "clamp($1, $2, $3)" },
    Entry { name: "mix", params: &[generic(GenType), generic(GenType), generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "mix($1, $2, $3)" },
    Entry { name: "abs", params: &[generic(GenType)], result: ResultSpec::SameAsParam(0), gen_string: "abs($1)" },
    Entry { name: "abs", params: &[generic(GenIType)], result: ResultSpec::SameAsParam(0), gen_string: "abs($1)" },
];

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn add_resolves_same_vec_width_only()
    {
        let reg = TypeRegistry::new();
        let vec3 = reg.get_builtin("vec3").unwrap();
        let vec4 = reg.get_builtin("vec4").unwrap();
        assert!(resolve(ARITHMETIC_OPERATORS, "add", &[vec3, vec3], &[false, false], &reg).is_ok());
        assert_eq!(resolve(ARITHMETIC_OPERATORS, "add", &[vec3, vec4], &[false, false], &reg), Err(OpError::NoMatch("add".into())));
    }

    #[test]
    fn dot_returns_float_regardless_of_vector_width()
    {
        let reg = TypeRegistry::new();
        let vec3 = reg.get_builtin("vec3").unwrap();
        let float = reg.get_builtin("float").unwrap();
        let entry = resolve(BUILTIN_FUNCTIONS, "dot", &[vec3, vec3], &[false, false], &reg).unwrap();
        assert_eq!(result_type(entry, &[vec3, vec3], &reg), float);
    }

    #[test]
    fn unsigned_literal_casts_to_signed_but_not_reverse()
    {
        let reg = TypeRegistry::new();
        let int_ty = reg.get_builtin("int").unwrap();
        let uint_ty = reg.get_builtin("uint").unwrap();
        // the literal uint argument may cast to int, resolving against the Signed,Signed overload
        assert!(resolve(RELATIONAL_OPERATORS, "lt", &[uint_ty, int_ty], &[true, false], &reg).is_ok());
        // a non-literal uint argument has no cast path to int
        assert!(resolve(RELATIONAL_OPERATORS, "lt", &[uint_ty, int_ty], &[false, false], &reg).is_err());
        assert_eq!(implicit_cast_cost(BaseType::Unsigned, BaseType::Signed, true), Some(1));
        assert_eq!(implicit_cast_cost(BaseType::Signed, BaseType::Unsigned, true), None);
    }
}
