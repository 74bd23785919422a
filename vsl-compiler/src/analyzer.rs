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

//! Semantic analysis (`spec.md` §4.2-§4.5): walks a [`ShaderFile`], builds
//! the [`TypeRegistry`]/[`ShaderInfo`] reflection, and emits one GLSL
//! translation unit per declared stage. The single pass doubles as the type
//! checker and the code generator driver: every expression is translated to
//! GLSL text as it is typed, so there is no separate lowering step.

use vsl_ast::{
    AssignOp, BinaryOp, ControlKeyword, Expr, LValue, LiteralValue, ShaderFile, Span, Statement, UnaryOp
};
use vsl_symbols::{Access, BindingVariable, ShaderInfo, SubpassInputVariable, UniformVariable, Variable, VariableExtra, VariableKind};
use vsl_types::{BaseType, MemberDef, MemberLayout, TexelRank, TexelType, TypeError, TypeId, TypeRegistry};

use crate::codegen::binding_layout;
use crate::codegen::glsl_type::glsl_type_name;
use crate::codegen::func::FuncGenerator;
use crate::codegen::stage::StageGenerator;
use crate::config::Config;
use crate::error::{ShaderError, ShaderErrorKind};
use crate::ops::{self, BITWISE_OPERATORS, BUILTIN_FUNCTIONS, LOGICAL_OPERATORS, OpError, RELATIONAL_OPERATORS, ARITHMETIC_OPERATORS};
use crate::scope::{ScopeError, ScopeKind, ScopeManager};

type Result<T> = std::result::Result<T, ShaderError>;

/// A fully analyzed shader: the reflection tables, the registry they
/// reference, and the generated GLSL source of every declared stage.
pub struct CompiledShader
{
    pub info: ShaderInfo,
    pub registry: TypeRegistry,
    pub stage_sources: Vec<(vsl_types::ShaderStages, String)>
}

/// The value of an analyzed expression: the GLSL text it lowers to, plus
/// enough type information to check the expression it feeds into.
struct TypedExpr
{
    text: String,
    data_type: TypeId,
    array_size: u32,
    is_literal: bool
}

impl TypedExpr
{
    fn plain(text: String, data_type: TypeId) -> Self
    {
        TypedExpr { text, data_type, array_size: 1, is_literal: false }
    }
}

/// Substitutes `$1..$9` argument placeholders and an optional `$op` operator
/// token into an [`ops::Entry::gen_string`] template.
fn render(template: &str, args: &[&str], op: Option<&str>) -> String
{
    let mut out = template.to_string();
    if let Some(token) = op {
        out = out.replace("$op", token);
    }
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("${}", i + 1), arg);
    }
    out
}

/// The operator names whose `gen_string` template embeds `$op`
/// (`spec.md` §4.3); every other table entry writes its token literally.
fn op_token(name: &str) -> Option<&'static str>
{
    match name {
        "add" => Some("+"),
        "sub" => Some("-"),
        "mul" => Some("*"),
        "div" => Some("/"),
        "lt" => Some("<"),
        "le" => Some("<="),
        "gt" => Some(">"),
        "ge" => Some(">="),
        "eq" => Some("=="),
        "ne" => Some("!="),
        _ => None
    }
}

fn unary_table(op: UnaryOp) -> (&'static str, &'static [ops::Entry])
{
    match op {
        UnaryOp::Neg => ("neg", ARITHMETIC_OPERATORS),
        UnaryOp::Not => ("not", ARITHMETIC_OPERATORS),
        UnaryOp::BitNot => ("bitnot", BITWISE_OPERATORS)
    }
}

fn binary_table(op: BinaryOp) -> (&'static str, &'static [ops::Entry])
{
    match op {
        BinaryOp::Add => ("add", ARITHMETIC_OPERATORS),
        BinaryOp::Sub => ("sub", ARITHMETIC_OPERATORS),
        BinaryOp::Mul => ("mul", ARITHMETIC_OPERATORS),
        BinaryOp::Div => ("div", ARITHMETIC_OPERATORS),
        BinaryOp::Mod => ("mod", ARITHMETIC_OPERATORS),
        BinaryOp::BitAnd => ("bitand", BITWISE_OPERATORS),
        BinaryOp::BitOr => ("bitor", BITWISE_OPERATORS),
        BinaryOp::BitXor => ("bitxor", BITWISE_OPERATORS),
        BinaryOp::Shl => ("shl", BITWISE_OPERATORS),
        BinaryOp::Shr => ("shr", BITWISE_OPERATORS),
        BinaryOp::Lt => ("lt", RELATIONAL_OPERATORS),
        BinaryOp::Le => ("le", RELATIONAL_OPERATORS),
        BinaryOp::Gt => ("gt", RELATIONAL_OPERATORS),
        BinaryOp::Ge => ("ge", RELATIONAL_OPERATORS),
        BinaryOp::Eq => ("eq", RELATIONAL_OPERATORS),
        BinaryOp::Ne => ("ne", RELATIONAL_OPERATORS),
        BinaryOp::LogicalAnd => ("logand", LOGICAL_OPERATORS),
        BinaryOp::LogicalOr => ("logor", LOGICAL_OPERATORS)
    }
}

fn assign_op_token(op: AssignOp) -> &'static str
{
    match op {
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/="
    }
}

/// `$Name`-style stage builtins (`spec.md` §3) map to their `gl_*` GLSL
/// spelling; every other variable reference uses its declared name.
fn builtin_glsl_name(name: &str) -> &str
{
    match name {
        "$VertexIndex" => "gl_VertexIndex",
        "$InstanceIndex" => "gl_InstanceIndex",
        "$Position" => "gl_Position",
        "$FragCoord" => "gl_FragCoord",
        "$PointCoord" => "gl_PointCoord",
        other => other
    }
}

const SWIZZLE_LETTERS: [&str; 3] = ["xyzw", "rgba", "stpq"];

fn swizzle_index(c: char) -> Option<u8>
{
    SWIZZLE_LETTERS.iter().find_map(|set| set.find(c).map(|i| i as u8))
}

/// GLSL builtin name of the integer coordinate vector `imageLoad`/`imageStore`
/// expect for a given texel rank, e.g. `E2DArray` -> `ivec3`.
fn image_coord_builtin(rank: TexelRank) -> &'static str
{
    match rank {
        TexelRank::E1D => "int",
        TexelRank::E2D => "ivec2",
        TexelRank::E3D => "ivec3",
        TexelRank::E1DArray => "ivec2",
        TexelRank::E2DArray => "ivec3",
        TexelRank::Cube => "ivec3",
        TexelRank::Buffer => "int"
    }
}

/// GLSL builtin name of the 4-component vector `imageLoad` returns / `imageStore`
/// expects for a given texel format's component type.
fn image_value_builtin(ty: TexelType) -> &'static str
{
    match ty {
        TexelType::Signed => "ivec4",
        TexelType::Unsigned => "uvec4",
        TexelType::Float | TexelType::UNorm | TexelType::SNorm => "vec4"
    }
}

/// Semantic analysis state for one shader source file: the type registry it
/// builds up, the global/local name table, and the running reflection.
pub struct Analyzer
{
    registry: TypeRegistry,
    scopes: ScopeManager,
    info: ShaderInfo
}

impl Default for Analyzer
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl Analyzer
{
    pub fn new() -> Self
    {
        Analyzer { registry: TypeRegistry::new(), scopes: ScopeManager::new(), info: ShaderInfo::new() }
    }

    fn type_err(&self, span: Span, bad_text: impl Into<String>, e: TypeError) -> ShaderError
    {
        ShaderError::new(ShaderErrorKind::Type, span, bad_text, e.to_string())
    }

    fn binding_err(&self, span: Span, bad_text: impl Into<String>, e: vsl_symbols::ReflectionError) -> ShaderError
    {
        ShaderError::new(ShaderErrorKind::Binding, span, bad_text, e.to_string())
    }

    fn scope_err(&self, span: Span, bad_text: impl Into<String>, e: ScopeError) -> ShaderError
    {
        ShaderError::new(ShaderErrorKind::Scope, span, bad_text, e.to_string())
    }

    fn op_err(&self, span: Span, bad_text: impl Into<String>, e: OpError) -> ShaderError
    {
        ShaderError::new(ShaderErrorKind::Operator, span, bad_text, e.to_string())
    }

    fn err(&self, kind: ShaderErrorKind, span: Span, bad_text: impl Into<String>, message: impl Into<String>) -> ShaderError
    {
        ShaderError::new(kind, span, bad_text, message)
    }

    // -- file-level declarations, in `ShaderFile`'s own field order --

    fn process_structs(&mut self, file: &ShaderFile) -> Result<()>
    {
        for sd in &file.structs {
            let mut members = Vec::with_capacity(sd.members.len());
            for m in &sd.members {
                let type_id = self.registry.parse_or_get(&m.type_name).map_err(|e| self.type_err(m.span, &m.type_name, e))?;
                let resolved = self.registry.resolve(type_id);
                let layout = if let Some(n) = resolved.numeric() {
                    MemberLayout::Numeric(n)
                } else if let Some(sid) = resolved.struct_ref() {
                    let st = self.registry.resolve_struct(sid);
                    MemberLayout::Nested { size: st.size, alignment: st.alignment }
                } else {
                    return Err(self.type_err(m.span, &m.name, TypeError::IllegalMemberType(m.name.clone())));
                };
                members.push(MemberDef { name: m.name.clone(), type_id, array_size: m.array_size, layout });
            }
            self.registry.add_struct(sd.name.clone(), members).map_err(|e| self.type_err(sd.span, &sd.name, e))?;
        }
        Ok(())
    }

    fn process_inputs(&mut self, file: &ShaderFile) -> Result<()>
    {
        for i in &file.inputs {
            let type_id = self.registry.parse_or_get(&i.type_name).map_err(|e| self.type_err(i.span, &i.type_name, e))?;
            let binding_count = self.registry.resolve(type_id).binding_count();
            self.info
                .add_input(i.name.clone(), i.location, type_id, i.array_size, binding_count)
                .map_err(|e| self.binding_err(i.span, &i.name, e))?;
            let var = Variable { name: i.name.clone(), kind: VariableKind::Input, data_type: type_id, array_size: i.array_size, access: Access::RO, extra: VariableExtra::None };
            self.scopes.add_global(var, &self.registry).map_err(|e| self.scope_err(i.span, &i.name, e))?;
        }
        Ok(())
    }

    fn process_outputs(&mut self, file: &ShaderFile) -> Result<()>
    {
        for o in &file.outputs {
            let type_id = self.registry.parse_or_get(&o.type_name).map_err(|e| self.type_err(o.span, &o.type_name, e))?;
            let binding_count = self.registry.resolve(type_id).binding_count();
            self.info.add_output(o.name.clone(), o.location, type_id, binding_count).map_err(|e| self.binding_err(o.span, &o.name, e))?;
            let var = Variable { name: o.name.clone(), kind: VariableKind::Output, data_type: type_id, array_size: 1, access: Access::WO, extra: VariableExtra::None };
            self.scopes.add_global(var, &self.registry).map_err(|e| self.scope_err(o.span, &o.name, e))?;
        }
        Ok(())
    }

    fn process_uniform(&mut self, file: &ShaderFile) -> Result<()>
    {
        let Some(u) = &file.uniform else { return Ok(()) };
        let struct_id = self.registry.get_struct(&u.struct_name).ok_or_else(|| self.type_err(u.span, &u.struct_name, TypeError::UnknownType(u.struct_name.clone())))?;
        self.registry.uniform_type(struct_id);
        self.info
            .set_uniform(UniformVariable { name: u.name.clone(), struct_id, stage_mask: vsl_types::ShaderStages::empty() })
            .map_err(|e| self.binding_err(u.span, &u.name, e))?;
        let members = self.registry.resolve_struct(struct_id).members.clone();
        for m in members {
            let var = Variable { name: m.name.clone(), kind: VariableKind::UniformMember, data_type: m.type_id, array_size: m.array_size, access: Access::RO, extra: VariableExtra::None };
            self.scopes.add_global(var, &self.registry).map_err(|e| self.scope_err(u.span, &m.name, e))?;
        }
        Ok(())
    }

    fn process_bindings(&mut self, file: &ShaderFile) -> Result<()>
    {
        for b in &file.bindings {
            let type_id = self.registry.parse_or_get(&b.type_name).map_err(|e| self.type_err(b.span, &b.type_name, e))?;
            self.info
                .add_binding(b.name.clone(), b.slot, type_id, vsl_types::ShaderStages::empty())
                .map_err(|e| self.binding_err(b.span, &b.name, e))?;
            let var = Variable { name: b.name.clone(), kind: VariableKind::Binding, data_type: type_id, array_size: 1, access: Access::RW, extra: VariableExtra::Binding { slot: b.slot } };
            self.scopes.add_global(var, &self.registry).map_err(|e| self.scope_err(b.span, &b.name, e))?;
        }
        Ok(())
    }

    fn process_subpass_inputs(&mut self, file: &ShaderFile) -> Result<()>
    {
        for s in &file.subpass_inputs {
            let type_id = self.registry.parse_or_get(&s.type_name).map_err(|e| self.type_err(s.span, &s.type_name, e))?;
            self.info
                .add_subpass_input(s.name.clone(), s.index, type_id, vsl_types::ShaderStages::empty())
                .map_err(|e| self.binding_err(s.span, &s.name, e))?;
            let var = Variable { name: s.name.clone(), kind: VariableKind::SubpassInput, data_type: type_id, array_size: 1, access: Access::RO, extra: VariableExtra::None };
            self.scopes.add_global(var, &self.registry).map_err(|e| self.scope_err(s.span, &s.name, e))?;
        }
        Ok(())
    }

    fn process_locals(&mut self, file: &ShaderFile) -> Result<()>
    {
        for l in &file.locals {
            let type_id = self.registry.parse_or_get(&l.type_name).map_err(|e| self.type_err(l.span, &l.type_name, e))?;
            let var = Variable {
                name: l.name.clone(),
                kind: VariableKind::Local,
                data_type: type_id,
                array_size: 1,
                access: Access::RW,
                extra: VariableExtra::Local { source_stage: l.source_stage, flat: l.flat }
            };
            self.scopes.add_global(var, &self.registry).map_err(|e| self.scope_err(l.span, &l.name, e))?;
        }
        Ok(())
    }

    // -- reflection bookkeeping driven by expression/lvalue resolution --

    fn mark_used(&mut self, var: &Variable, stage: vsl_types::ShaderStages, gen: &mut FuncGenerator)
    {
        match var.kind {
            VariableKind::Binding => {
                if let VariableExtra::Binding { slot } = var.extra {
                    if let Some(b) = self.info.bindings.iter_mut().find(|b: &&mut BindingVariable| b.slot == slot) {
                        b.stage_mask |= stage;
                    }
                    gen.emit_binding_index(slot);
                }
            },
            VariableKind::SubpassInput => {
                if let Some(s) = self.info.subpass_inputs.iter_mut().find(|s: &&mut SubpassInputVariable| s.name == var.name) {
                    s.stage_mask |= stage;
                }
            },
            VariableKind::UniformMember => {
                if let Some(u) = &mut self.info.uniform {
                    u.stage_mask |= stage;
                }
            },
            _ => {}
        }
    }

    fn var_ref_text(&self, var: &Variable) -> String
    {
        match var.extra {
            VariableExtra::Builtin { .. } => builtin_glsl_name(&var.name).to_string(),
            VariableExtra::Binding { slot } => binding_layout::binding_ref(&self.registry, &self.info, slot),
            _ => var.name.clone()
        }
    }

    fn check_role_stage(&self, var: &Variable, stage: vsl_types::ShaderStages, span: Span) -> Result<()>
    {
        match var.kind {
            VariableKind::Input if stage != vsl_types::ShaderStages::VERTEX => {
                Err(self.err(ShaderErrorKind::Scope, span, &var.name, format!("'{}' is only visible in the vertex stage", var.name)))
            },
            VariableKind::Output if stage != vsl_types::ShaderStages::FRAGMENT => {
                Err(self.err(ShaderErrorKind::Scope, span, &var.name, format!("'{}' is only visible in the fragment stage", var.name)))
            },
            _ => Ok(())
        }
    }

    /// Implicit-casts `value` to `target` when they are both numeric and a
    /// one-step cast exists (`spec.md` §4.3); exact-type matches pass
    /// through untouched. Fails when no cast path exists.
    fn coerce(&self, target: TypeId, value: TypedExpr, span: Span) -> Result<String>
    {
        if value.data_type == target {
            return Ok(value.text);
        }
        let target_ty = self.registry.resolve(target);
        let value_ty = self.registry.resolve(value.data_type);
        if let (Some(tn), Some(vn)) = (target_ty.numeric(), value_ty.numeric()) {
            if tn.vec_dims == vn.vec_dims
                && tn.mat_cols == vn.mat_cols
                && ops::implicit_cast_cost(value_ty.base_type, target_ty.base_type, value.is_literal).is_some()
            {
                let cast = glsl_type_name(&self.registry, target);
                return Ok(format!("{cast}({})", value.text));
            }
        }
        Err(self.err(ShaderErrorKind::Type, span, &value.text, "value is not assignable to the target's type"))
    }

    /// The GLSL coordinate/value types `imageLoad`/`imageStore` use for a
    /// storage image or texel buffer, derived from its texel rank and format.
    fn image_types(&self, ty: &vsl_types::ShaderType, span: Span, bad_text: &str) -> Result<(TypeId, TypeId)>
    {
        let texel = ty
            .texel()
            .ok_or_else(|| self.err(ShaderErrorKind::Type, span, bad_text, "expected an image or texel buffer type"))?;
        let coord_name = image_coord_builtin(texel.rank);
        let value_name = image_value_builtin(texel.format.ty);
        let coord_ty = self.registry.get_builtin(coord_name).expect("image coordinate builtin is always registered");
        let value_ty = self.registry.get_builtin(value_name).expect("image value builtin is always registered");
        Ok((coord_ty, value_ty))
    }

    // -- expression analysis --

    fn analyze_expr(&mut self, expr: &Expr, stage: vsl_types::ShaderStages, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        match expr {
            Expr::Literal { value, .. } => Ok(self.analyze_literal(*value)),
            Expr::Name { name, span } => self.analyze_name(name, stage, *span, gen),
            Expr::Unary { op, operand, span } => self.analyze_unary(*op, operand, stage, *span, gen),
            Expr::Binary { op, left, right, span } => self.analyze_binary(*op, left, right, stage, *span, gen),
            Expr::Ternary { cond, then_value, else_value, span } => self.analyze_ternary(cond, then_value, else_value, stage, *span, gen),
            Expr::Index { base, index, span } => self.analyze_index(base, index, stage, *span, gen),
            Expr::Member { base, member, span } => self.analyze_member(base, member, stage, *span, gen),
            Expr::Call { name, args, span } => self.analyze_call(name, args, stage, *span, gen)
        }
    }

    fn analyze_literal(&self, value: LiteralValue) -> TypedExpr
    {
        let (text, type_name) = match value {
            LiteralValue::Int(i) => (i.to_string(), "int"),
            LiteralValue::UInt(u) => (format!("{u}u"), "uint"),
            LiteralValue::Float(f) => (format!("{f:?}"), "float"),
            LiteralValue::Bool(b) => (b.to_string(), "bool")
        };
        let data_type = self.registry.get_builtin(type_name).expect("literal builtin types are always registered");
        TypedExpr { text, data_type, array_size: 1, is_literal: true }
    }

    fn analyze_name(&mut self, name: &str, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        let var = self.scopes.lookup(name).cloned().ok_or_else(|| self.err(ShaderErrorKind::Scope, span, name, format!("'{name}' is not declared")))?;
        self.check_role_stage(&var, stage, span)?;
        if !var.readable_in(stage) {
            return Err(self.err(ShaderErrorKind::Scope, span, name, format!("'{name}' is not readable here")));
        }
        self.mark_used(&var, stage, gen);
        let text = self.var_ref_text(&var);
        Ok(TypedExpr { text, data_type: var.data_type, array_size: var.array_size, is_literal: false })
    }

    fn analyze_unary(&mut self, op: UnaryOp, operand: &Expr, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        let operand_t = self.analyze_expr(operand, stage, gen)?;
        let (name, table) = unary_table(op);
        let entry = ops::resolve(table, name, &[operand_t.data_type], &[operand_t.is_literal], &self.registry).map_err(|e| self.op_err(span, name, e))?;
        let result_ty = ops::result_type(entry, &[operand_t.data_type], &self.registry);
        let text = render(entry.gen_string, &[operand_t.text.as_str()], op_token(name));
        Ok(TypedExpr::plain(text, result_ty))
    }

    fn analyze_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        let left_t = self.analyze_expr(left, stage, gen)?;
        let right_t = self.analyze_expr(right, stage, gen)?;
        let (name, table) = binary_table(op);
        let arg_types = [left_t.data_type, right_t.data_type];
        let arg_lits = [left_t.is_literal, right_t.is_literal];
        let entry = ops::resolve(table, name, &arg_types, &arg_lits, &self.registry).map_err(|e| self.op_err(span, name, e))?;
        let result_ty = ops::result_type(entry, &arg_types, &self.registry);
        let text = render(entry.gen_string, &[left_t.text.as_str(), right_t.text.as_str()], op_token(name));
        Ok(TypedExpr::plain(text, result_ty))
    }

    fn analyze_ternary(&mut self, cond: &Expr, then_value: &Expr, else_value: &Expr, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        let cond_t = self.analyze_expr(cond, stage, gen)?;
        if !self.registry.resolve(cond_t.data_type).is_boolean() {
            return Err(self.err(ShaderErrorKind::Type, span, &cond_t.text, "ternary condition must be bool"));
        }
        let then_t = self.analyze_expr(then_value, stage, gen)?;
        let else_t = self.analyze_expr(else_value, stage, gen)?;
        if then_t.data_type != else_t.data_type {
            return Err(self.err(ShaderErrorKind::Type, span, &then_t.text, "ternary branches must have the same type"));
        }
        let text = format!("({} ? {} : {})", cond_t.text, then_t.text, else_t.text);
        Ok(TypedExpr::plain(text, then_t.data_type))
    }

    fn analyze_index(&mut self, base: &Expr, index: &Expr, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        let base_t = self.analyze_expr(base, stage, gen)?;
        let base_ty = *self.registry.resolve(base_t.data_type);
        if matches!(base_ty.base_type, BaseType::Image | BaseType::RWTexels) {
            let index_t = self.analyze_expr(index, stage, gen)?;
            let (coord_ty, value_ty) = self.image_types(&base_ty, span, &base_t.text)?;
            let coord_text = self.coerce(coord_ty, index_t, span)?;
            let text = format!("imageLoad({}, {coord_text})", base_t.text);
            return Ok(TypedExpr::plain(text, value_ty));
        }
        let index_t = self.analyze_expr(index, stage, gen)?;
        let index_ty = self.registry.resolve(index_t.data_type);
        if !matches!(index_ty.base_type, BaseType::Signed | BaseType::Unsigned) || !index_ty.is_scalar() {
            return Err(self.err(ShaderErrorKind::Type, span, &index_t.text, "array index must be a scalar int or uint"));
        }
        if base_t.array_size > 1 {
            let text = format!("{}[{}]", base_t.text, index_t.text);
            return Ok(TypedExpr { text, data_type: base_t.data_type, array_size: 1, is_literal: false });
        }
        if matches!(base_ty.base_type, BaseType::ROBuffer | BaseType::RWBuffer) {
            let text = format!("{}.data[{}]", base_t.text, index_t.text);
            return Ok(TypedExpr::plain(text, base_t.data_type));
        }
        if base_ty.is_vector() {
            let n = base_ty.numeric().expect("checked is_vector above");
            let scalar_name = match base_ty.base_type {
                BaseType::Float => "float",
                BaseType::Signed => "int",
                BaseType::Unsigned => "uint",
                BaseType::Boolean => "bool",
                _ => unreachable!("is_vector implies a numeric base type")
            };
            let _ = n;
            let scalar_ty = self.registry.get_builtin(scalar_name).expect("scalar builtin is always registered");
            let text = format!("{}[{}]", base_t.text, index_t.text);
            return Ok(TypedExpr::plain(text, scalar_ty));
        }
        Err(self.err(ShaderErrorKind::Type, span, &base_t.text, "value cannot be indexed"))
    }

    fn analyze_member(&mut self, base: &Expr, member: &str, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        let base_t = self.analyze_expr(base, stage, gen)?;
        let base_ty = self.registry.resolve(base_t.data_type);
        if let Some(sid) = base_ty.struct_ref() {
            let st = self.registry.resolve_struct(sid);
            let (m, _offset) = st
                .get_member(member)
                .ok_or_else(|| self.err(ShaderErrorKind::Type, span, member, format!("'{}' has no member '{member}'", st.name)))?;
            let text = format!("{}.{member}", base_t.text);
            return Ok(TypedExpr { text, data_type: m.type_id, array_size: m.array_size, is_literal: false });
        }
        if base_ty.is_vector() {
            let n = base_ty.numeric().expect("checked is_vector above");
            if member.is_empty() || member.len() > 4 {
                return Err(self.err(ShaderErrorKind::Type, span, member, "swizzle must name 1 to 4 components"));
            }
            for c in member.chars() {
                match swizzle_index(c) {
                    Some(i) if i < n.vec_dims => {},
                    _ => return Err(self.err(ShaderErrorKind::Type, span, member, format!("'{c}' is not a valid component of this vector")))
                }
            }
            let text = format!("{}.{member}", base_t.text);
            let data_type = if member.len() == 1 {
                let scalar_name = match base_ty.base_type {
                    BaseType::Float => "float",
                    BaseType::Signed => "int",
                    BaseType::Unsigned => "uint",
                    BaseType::Boolean => "bool",
                    _ => unreachable!("is_vector implies a numeric base type")
                };
                self.registry.get_builtin(scalar_name).expect("scalar builtin is always registered")
            } else {
                let vec_name = match base_ty.base_type {
                    BaseType::Float => format!("vec{}", member.len()),
                    BaseType::Signed => format!("ivec{}", member.len()),
                    BaseType::Unsigned => format!("uvec{}", member.len()),
                    BaseType::Boolean => format!("bvec{}", member.len()),
                    _ => unreachable!("is_vector implies a numeric base type")
                };
                self.registry.get_builtin(&vec_name).expect("vector builtins up to 4 components are always registered")
            };
            return Ok(TypedExpr::plain(text, data_type));
        }
        Err(self.err(ShaderErrorKind::Type, span, member, "value has no members"))
    }

    fn analyze_call(&mut self, name: &str, args: &[Expr], stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<TypedExpr>
    {
        let mut arg_ts = Vec::with_capacity(args.len());
        for a in args {
            arg_ts.push(self.analyze_expr(a, stage, gen)?);
        }
        let arg_types: Vec<TypeId> = arg_ts.iter().map(|a| a.data_type).collect();
        let arg_lits: Vec<bool> = arg_ts.iter().map(|a| a.is_literal).collect();
        let arg_texts: Vec<&str> = arg_ts.iter().map(|a| a.text.as_str()).collect();

        if BUILTIN_FUNCTIONS.iter().any(|e| e.name == name) {
            let entry = ops::resolve(BUILTIN_FUNCTIONS, name, &arg_types, &arg_lits, &self.registry).map_err(|e| self.op_err(span, name, e))?;
            let result_ty = ops::result_type(entry, &arg_types, &self.registry);
            let text = render(entry.gen_string, &arg_texts, None);
            return Ok(TypedExpr::plain(text, result_ty));
        }
        if let Some(ty) = self.registry.get_builtin(name) {
            let text = format!("{name}({})", arg_texts.join(", "));
            return Ok(TypedExpr::plain(text, ty));
        }
        if let Some(sid) = self.registry.get_struct(name) {
            let ty = self.registry.struct_type(sid);
            let text = format!("{name}({})", arg_texts.join(", "));
            return Ok(TypedExpr::plain(text, ty));
        }
        Err(self.err(ShaderErrorKind::Function, span, name, format!("'{name}' is not a known function or type")))
    }

    // -- lvalue resolution --

    fn analyze_lvalue(&mut self, lv: &LValue, stage: vsl_types::ShaderStages, gen: &mut FuncGenerator) -> Result<(String, TypeId)>
    {
        let name = lv.name();
        let var = self.scopes.lookup(name).cloned().ok_or_else(|| self.err(ShaderErrorKind::Scope, lv.span(), name, format!("'{name}' is not declared")))?;
        self.check_role_stage(&var, stage, lv.span())?;
        if !var.writable_in(stage) {
            return Err(self.err(ShaderErrorKind::Scope, lv.span(), name, format!("'{name}' is not writable here")));
        }
        self.mark_used(&var, stage, gen);
        let base_text = self.var_ref_text(&var);
        match lv {
            LValue::Name { .. } => Ok((base_text, var.data_type)),
            LValue::Index { index, span, .. } => {
                let index_t = self.analyze_expr(index, stage, gen)?;
                let index_ty = self.registry.resolve(index_t.data_type);
                if !matches!(index_ty.base_type, BaseType::Signed | BaseType::Unsigned) || !index_ty.is_scalar() {
                    return Err(self.err(ShaderErrorKind::Type, *span, &index_t.text, "array index must be a scalar int or uint"));
                }
                let var_ty = self.registry.resolve(var.data_type);
                if matches!(var_ty.base_type, BaseType::RWBuffer) {
                    Ok((format!("{base_text}.data[{}]", index_t.text), var.data_type))
                } else {
                    Ok((format!("{base_text}[{}]", index_t.text), var.data_type))
                }
            },
            LValue::Swizzle { components, span, .. } => {
                let var_ty = self.registry.resolve(var.data_type);
                let n = var_ty.numeric().ok_or_else(|| self.err(ShaderErrorKind::Type, *span, components, "value has no components to swizzle"))?;
                if components.is_empty() || components.len() > 4 {
                    return Err(self.err(ShaderErrorKind::Type, *span, components, "swizzle must name 1 to 4 components"));
                }
                let mut seen = Vec::new();
                for c in components.chars() {
                    match swizzle_index(c) {
                        Some(i) if i < n.vec_dims => {
                            if seen.contains(&c) {
                                return Err(self.err(ShaderErrorKind::Type, *span, components, "a write swizzle may not repeat a component"));
                            }
                            seen.push(c);
                        },
                        _ => return Err(self.err(ShaderErrorKind::Type, *span, components, format!("'{c}' is not a valid component of this vector")))
                    }
                }
                Ok((format!("{base_text}.{components}"), var.data_type))
            }
        }
    }

    // -- statement analysis --

    fn analyze_statement(&mut self, stmt: &Statement, stage: vsl_types::ShaderStages, gen: &mut FuncGenerator) -> Result<()>
    {
        match stmt {
            Statement::VarDecl { name, type_name, array_size, init, span } => self.analyze_var_decl(name, type_name, *array_size, init, stage, *span, gen),
            Statement::Assign { target, op, value, span } => self.analyze_assign(target, *op, value, stage, *span, gen),
            Statement::If { branches, else_body, .. } => self.analyze_if(branches, else_body, stage, gen),
            Statement::For { var_name, start, end, step, body, span } => self.analyze_for(var_name, start, end, step, body, stage, *span, gen),
            Statement::Control { keyword, span } => self.analyze_control(*keyword, stage, *span, gen),
            Statement::ExprStatement { expr, span } => self.analyze_expr_statement(expr, stage, *span, gen)
        }
    }

    fn analyze_var_decl(&mut self, name: &str, type_name: &str, array_size: u32, init: &Option<Expr>, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<()>
    {
        let type_id = self.registry.parse_or_get(type_name).map_err(|e| self.type_err(span, type_name, e))?;
        let ty = glsl_type_name(&self.registry, type_id);
        match init {
            Some(expr) => {
                let value = self.analyze_expr(expr, stage, gen)?;
                let text = self.coerce(type_id, value, span)?;
                if array_size > 1 {
                    gen.emit_def(&format!("{ty}[{array_size}]"), name, &text);
                } else {
                    gen.emit_def(&ty, name, &text);
                }
            },
            None => {
                if array_size > 1 {
                    gen.emit_decl(&format!("{ty}[{array_size}]"), name);
                } else {
                    gen.emit_decl(&ty, name);
                }
            }
        }
        let var = Variable { name: name.to_string(), kind: VariableKind::Private, data_type: type_id, array_size, access: Access::RW, extra: VariableExtra::None };
        self.scopes.declare_local(var).map_err(|e| self.scope_err(span, name, e))
    }

    fn analyze_assign(&mut self, target: &LValue, op: AssignOp, value: &Expr, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<()>
    {
        if let LValue::Index { name, index, span: idx_span } = target {
            if let Some(var) = self.scopes.lookup(name).cloned() {
                let var_ty = *self.registry.resolve(var.data_type);
                if matches!(var_ty.base_type, BaseType::Image | BaseType::RWTexels) {
                    return self.analyze_image_store(&var, &var_ty, index, op, value, stage, *idx_span, span, gen);
                }
            }
        }
        let (lvalue_text, target_ty) = self.analyze_lvalue(target, stage, gen)?;
        let value_t = self.analyze_expr(value, stage, gen)?;
        let value_text = if op == AssignOp::Assign {
            self.coerce(target_ty, value_t, span)?
        } else {
            if value_t.data_type != target_ty {
                return Err(self.err(ShaderErrorKind::Type, span, &value_t.text, "compound assignment requires matching types"));
            }
            value_t.text
        };
        gen.emit_assign(&lvalue_text, assign_op_token(op), &value_text);
        Ok(())
    }

    /// Lowers `image[coord] = value;` to GLSL's `imageStore(image, coord, value);`
    /// form, since storage images and texel buffers have no subscript syntax.
    #[allow(clippy::too_many_arguments)]
    fn analyze_image_store(
        &mut self, var: &Variable, var_ty: &vsl_types::ShaderType, index: &Expr, op: AssignOp, value: &Expr, stage: vsl_types::ShaderStages, idx_span: Span, span: Span,
        gen: &mut FuncGenerator
    ) -> Result<()>
    {
        if op != AssignOp::Assign {
            return Err(self.err(ShaderErrorKind::Operator, span, &var.name, "image writes only support plain assignment"));
        }
        self.check_role_stage(var, stage, idx_span)?;
        if !var.writable_in(stage) {
            return Err(self.err(ShaderErrorKind::Scope, idx_span, &var.name, format!("'{}' is not writable here", var.name)));
        }
        self.mark_used(var, stage, gen);
        let (coord_ty, value_ty) = self.image_types(var_ty, idx_span, &var.name)?;
        let index_t = self.analyze_expr(index, stage, gen)?;
        let coord_text = self.coerce(coord_ty, index_t, idx_span)?;
        let value_t = self.analyze_expr(value, stage, gen)?;
        let value_text = self.coerce(value_ty, value_t, span)?;
        let image_ref = self.var_ref_text(var);
        let store_ref = format!("{image_ref}, {coord_text}");
        gen.emit_image_store(&store_ref, &value_text);
        Ok(())
    }

    fn analyze_if(&mut self, branches: &[(Expr, Vec<Statement>)], else_body: &Option<Vec<Statement>>, stage: vsl_types::ShaderStages, gen: &mut FuncGenerator) -> Result<()>
    {
        for (i, (cond, body)) in branches.iter().enumerate() {
            let cond_t = self.analyze_expr(cond, stage, gen)?;
            if !self.registry.resolve(cond_t.data_type).is_boolean() {
                return Err(self.err(ShaderErrorKind::Type, cond.span(), &cond_t.text, "condition must be bool"));
            }
            if i == 0 {
                gen.emit_if(&cond_t.text);
            } else {
                gen.emit_elif(&cond_t.text);
            }
            self.scopes.push_scope(ScopeKind::Conditional);
            for s in body {
                self.analyze_statement(s, stage, gen)?;
            }
            self.scopes.pop_scope();
        }
        if let Some(body) = else_body {
            gen.emit_else();
            self.scopes.push_scope(ScopeKind::Conditional);
            for s in body {
                self.analyze_statement(s, stage, gen)?;
            }
            self.scopes.pop_scope();
        }
        gen.close_block();
        Ok(())
    }

    fn analyze_for(&mut self, var_name: &str, start: &Expr, end: &Expr, step: &Expr, body: &[Statement], stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<()>
    {
        let int_ty = self.registry.get_builtin("int").expect("builtin int is always registered");
        let start_t = self.analyze_expr(start, stage, gen)?;
        let end_t = self.analyze_expr(end, stage, gen)?;
        let step_t = self.analyze_expr(step, stage, gen)?;
        for (label, t) in [("start", &start_t), ("end", &end_t), ("step", &step_t)] {
            if t.data_type != int_ty {
                return Err(self.err(ShaderErrorKind::Type, span, &t.text, format!("for loop {label} bound must be an int")));
            }
        }
        gen.emit_for(var_name, &start_t.text, &end_t.text, &step_t.text);
        self.scopes.push_scope(ScopeKind::Loop);
        let var = Variable { name: var_name.to_string(), kind: VariableKind::Private, data_type: int_ty, array_size: 1, access: Access::RO, extra: VariableExtra::None };
        self.scopes.declare_local(var).map_err(|e| self.scope_err(span, var_name, e))?;
        for s in body {
            self.analyze_statement(s, stage, gen)?;
        }
        self.scopes.pop_scope();
        gen.close_block();
        Ok(())
    }

    fn analyze_control(&mut self, keyword: ControlKeyword, stage: vsl_types::ShaderStages, span: Span, gen: &mut FuncGenerator) -> Result<()>
    {
        match keyword {
            ControlKeyword::Break | ControlKeyword::Continue if !self.scopes.in_loop() => {
                return Err(self.err(ShaderErrorKind::Control, span, "", "break/continue used outside of a loop"));
            },
            ControlKeyword::Discard if stage != vsl_types::ShaderStages::FRAGMENT => {
                return Err(self.err(ShaderErrorKind::Control, span, "", "discard is only valid in the fragment stage"));
            },
            _ => {}
        }
        gen.emit_control(keyword);
        Ok(())
    }

    fn analyze_expr_statement(&mut self, expr: &Expr, stage: vsl_types::ShaderStages, _span: Span, gen: &mut FuncGenerator) -> Result<()>
    {
        let value = self.analyze_expr(expr, stage, gen)?;
        gen.emit_expr_statement(&value.text);
        Ok(())
    }
}

/// Analyzes one parsed shader file into a complete compiled result: a
/// validated reflection table and one GLSL translation unit per stage
/// (`spec.md` §4.2-§4.6).
pub fn analyze(file: &ShaderFile, config: &Config) -> Result<CompiledShader>
{
    let mut an = Analyzer::new();
    an.process_structs(file)?;
    an.process_inputs(file)?;
    an.process_outputs(file)?;
    an.process_uniform(file)?;
    an.process_bindings(file)?;
    an.process_subpass_inputs(file)?;
    an.process_locals(file)?;

    let locals: Vec<Variable> = an.scopes.globals().iter().filter(|v| matches!(v.extra, VariableExtra::Local { .. })).cloned().collect();

    let mut stage_sources = Vec::with_capacity(file.stages.len());
    for stage_fn in &file.stages {
        an.scopes.push_global_scope(stage_fn.stage, &an.registry);
        let mut gen = FuncGenerator::new();
        for stmt in &stage_fn.body {
            an.analyze_statement(stmt, stage_fn.stage, &mut gen)?;
        }
        let body = gen.finish();
        let stage_gen = StageGenerator::new(&an.registry, config.binding_table_sizes);
        let source = stage_gen.generate(stage_fn.stage, &an.info, &locals, &body);
        stage_sources.push((stage_fn.stage, source));
    }

    Ok(CompiledShader { info: an.info, registry: an.registry, stage_sources })
}

#[cfg(test)]
mod tests
{
    use vsl_ast::{BindingDecl, InputDecl, ShaderKind, StageFunction};
    use vsl_types::ShaderStages;

    use super::*;

    fn span() -> Span
    {
        Span::new(1, 1)
    }

    fn empty_file() -> ShaderFile
    {
        ShaderFile { kind: ShaderKind::Graphics, structs: vec![], inputs: vec![], outputs: vec![], uniform: None, bindings: vec![], subpass_inputs: vec![], locals: vec![], stages: vec![] }
    }

    #[test]
    fn vertex_stage_writes_gl_position()
    {
        let mut file = empty_file();
        file.inputs.push(InputDecl { location: 0, name: "pos".into(), type_name: "vec3".into(), array_size: 1, span: span() });
        file.stages.push(StageFunction {
            stage: ShaderStages::VERTEX,
            body: vec![Statement::Assign {
                target: LValue::Swizzle { name: "$Position".into(), components: "xyz".into(), span: span() },
                op: AssignOp::Assign,
                value: Expr::Name { name: "pos".into(), span: span() },
                span: span()
            }],
            span: span()
        });
        let result = analyze(&file, &Config::default()).unwrap();
        let (_, src) = &result.stage_sources[0];
        assert!(src.contains("gl_Position.xyz = pos;"));
    }

    #[test]
    fn binding_reference_loads_index_once_and_builds_array_ref()
    {
        let mut file = empty_file();
        file.bindings.push(BindingDecl { slot: 2, name: "albedo".into(), type_name: "sampler2D".into(), span: span() });
        file.stages.push(StageFunction {
            stage: ShaderStages::FRAGMENT,
            body: vec![
                Statement::VarDecl { name: "a".into(), type_name: "sampler2D".into(), array_size: 1, init: Some(Expr::Name { name: "albedo".into(), span: span() }), span: span() },
                Statement::VarDecl { name: "b".into(), type_name: "sampler2D".into(), array_size: 1, init: Some(Expr::Name { name: "albedo".into(), span: span() }), span: span() },
            ],
            span: span()
        });
        let result = analyze(&file, &Config::default()).unwrap();
        let (_, src) = &result.stage_sources[0];
        assert_eq!(src.matches("_b2").count(), 3);
        assert!(src.contains("_samplers_0[_b2]"));
    }

    #[test]
    fn reading_an_output_in_the_fragment_stage_is_rejected()
    {
        let mut file = empty_file();
        file.outputs.push(vsl_ast::OutputDecl { location: 0, name: "color".into(), type_name: "vec4".into(), span: span() });
        file.stages.push(StageFunction {
            stage: ShaderStages::VERTEX,
            body: vec![Statement::ExprStatement { expr: Expr::Name { name: "color".into(), span: span() }, span: span() }],
            span: span()
        });
        let err = analyze(&file, &Config::default()).unwrap_err();
        assert_eq!(err.kind, ShaderErrorKind::Scope);
    }

    #[test]
    fn arithmetic_expression_lowers_to_generated_operator_text()
    {
        let mut file = empty_file();
        file.locals.push(vsl_ast::LocalDecl { name: "v_light".into(), type_name: "float".into(), flat: false, source_stage: ShaderStages::VERTEX, dest_stage: ShaderStages::FRAGMENT, span: span() });
        file.stages.push(StageFunction {
            stage: ShaderStages::VERTEX,
            body: vec![Statement::Assign {
                target: LValue::Name { name: "v_light".into(), span: span() },
                op: AssignOp::Assign,
                value: Expr::Binary {
                    op: BinaryOp::Add,
                    left: Box::new(Expr::Literal { value: LiteralValue::Float(1.0), span: span() }),
                    right: Box::new(Expr::Literal { value: LiteralValue::Float(2.0), span: span() }),
                    span: span()
                },
                span: span()
            }],
            span: span()
        });
        let result = analyze(&file, &Config::default()).unwrap();
        let (_, src) = &result.stage_sources[0];
        assert!(src.contains("v_light = (1.0 + 2.0);"));
    }

    #[test]
    fn writing_a_storage_image_lowers_to_image_store()
    {
        let mut file = empty_file();
        file.bindings.push(BindingDecl { slot: 1, name: "target".into(), type_name: "image2D<rgba8_unorm>".into(), span: span() });
        file.stages.push(StageFunction {
            stage: ShaderStages::FRAGMENT,
            body: vec![Statement::Assign {
                target: LValue::Index {
                    name: "target".into(),
                    index: Expr::Call {
                        name: "ivec2".into(),
                        args: vec![Expr::Literal { value: LiteralValue::Int(0), span: span() }, Expr::Literal { value: LiteralValue::Int(0), span: span() }],
                        span: span()
                    },
                    span: span()
                },
                op: AssignOp::Assign,
                value: Expr::Call {
                    name: "vec4".into(),
                    args: vec![Expr::Literal { value: LiteralValue::Float(1.0), span: span() }],
                    span: span()
                },
                span: span()
            }],
            span: span()
        });
        let result = analyze(&file, &Config::default()).unwrap();
        let (_, src) = &result.stage_sources[0];
        assert!(src.contains("imageStore("));
        assert!(src.contains("ivec2(0, 0)"));
        assert!(!src.contains("= vec4(1.0);"));
    }
}
