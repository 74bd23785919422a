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

//! Global and per-stage name resolution (`spec.md` §4.2). A flat global list
//! (inputs, outputs, bindings, constants, uniform members, struct names) plus
//! a stack of [`Scope`]s pushed/popped while walking one stage function.

use thiserror::Error;
use vsl_symbols::{Access, Variable, VariableExtra, VariableKind};
use vsl_types::{ShaderStages, TypeRegistry};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind
{
    Function,
    Conditional,
    Loop
}

#[derive(Clone, Debug, Default)]
pub struct Scope
{
    pub kind: Option<ScopeKind>,
    pub variables: Vec<Variable>
}

impl Scope
{
    pub fn new(kind: ScopeKind) -> Self
    {
        Scope { kind: Some(kind), variables: Vec::new() }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScopeError
{
    #[error("'{0}' is already declared in this scope")]
    DuplicateGlobal(String),
    #[error("'{0}' is a reserved name")]
    ReservedName(String),
    #[error("'{0}' shadows a global declaration")]
    ShadowsGlobal(String),
    #[error("break/continue used outside of a loop")]
    NotInLoop
}

fn is_reserved(name: &str, registry: &TypeRegistry) -> bool
{
    name.starts_with("gl_") || name.starts_with("vk_") || name.starts_with("_vsl") || registry.get_builtin(name).is_some()
}

/// Stage-specific builtins seeded into the Function scope of a stage entry
/// point (`spec.md` §4.2). Vertex sees `$VertexIndex`/`$InstanceIndex`
/// (read-only) and `$Position` (write-only); Fragment sees `$FragCoord`/
/// `$PointCoord` (read-only).
fn stage_builtins(stage: ShaderStages, registry: &TypeRegistry) -> Vec<Variable>
{
    let int = registry.get_builtin("int").expect("builtin int is always registered");
    let vec4 = registry.get_builtin("vec4").expect("builtin vec4 is always registered");
    let vec2 = registry.get_builtin("vec2").expect("builtin vec2 is always registered");
    let builtin = |name: &str, data_type: vsl_types::TypeId, access: Access| Variable {
        name: name.to_string(),
        kind: VariableKind::Builtin,
        data_type,
        array_size: 1,
        access,
        extra: VariableExtra::Builtin { stage, access }
    };
    match stage {
        ShaderStages::VERTEX => vec![
            builtin("$VertexIndex", int, Access::RO),
            builtin("$InstanceIndex", int, Access::RO),
            builtin("$Position", vec4, Access::WO),
        ],
        ShaderStages::FRAGMENT => vec![builtin("$FragCoord", vec4, Access::RO), builtin("$PointCoord", vec2, Access::RO)],
        _ => Vec::new()
    }
}

/// Two-tier name resolution: a flat global list plus a per-stage stack of
/// [`Scope`]s, reset between stage functions via [`ScopeManager::push_global_scope`].
#[derive(Clone, Debug, Default)]
pub struct ScopeManager
{
    globals: Vec<Variable>,
    stack: Vec<Scope>
}

impl ScopeManager
{
    pub fn new() -> Self
    {
        ScopeManager { globals: Vec::new(), stack: Vec::new() }
    }

    pub fn globals(&self) -> &[Variable]
    {
        &self.globals
    }

    /// Fails on duplicate or reserved name (`gl_`/`vk_`/`_vsl` prefixes, or
    /// a collision with a builtin type name).
    pub fn add_global(&mut self, var: Variable, registry: &TypeRegistry) -> Result<(), ScopeError>
    {
        if is_reserved(&var.name, registry) {
            return Err(ScopeError::ReservedName(var.name));
        }
        if self.globals.iter().any(|g| g.name == var.name) {
            return Err(ScopeError::DuplicateGlobal(var.name));
        }
        self.globals.push(var);
        Ok(())
    }

    /// Pushes the Function scope that will hold a stage entry point's
    /// locals, seeded with that stage's builtins. Clears any scopes left
    /// over from a previous stage.
    pub fn push_global_scope(&mut self, stage: ShaderStages, registry: &TypeRegistry)
    {
        self.stack.clear();
        let mut scope = Scope::new(ScopeKind::Function);
        scope.variables.extend(stage_builtins(stage, registry));
        self.stack.push(scope);
    }

    pub fn push_scope(&mut self, kind: ScopeKind)
    {
        self.stack.push(Scope::new(kind));
    }

    pub fn pop_scope(&mut self)
    {
        self.stack.pop();
    }

    pub fn in_loop(&self) -> bool
    {
        self.stack.iter().any(|s| s.kind == Some(ScopeKind::Loop))
    }

    /// Declares a local in the innermost active scope; fails if it shadows
    /// any global (the language disallows shadowing to keep generated GLSL
    /// unambiguous).
    pub fn declare_local(&mut self, var: Variable) -> Result<(), ScopeError>
    {
        if self.globals.iter().any(|g| g.name == var.name) {
            return Err(ScopeError::ShadowsGlobal(var.name));
        }
        let scope = self.stack.last_mut().expect("declare_local called with no active scope stack");
        scope.variables.push(var);
        Ok(())
    }

    /// Innermost-first scan of active scopes, then globals.
    pub fn lookup(&self, name: &str) -> Option<&Variable>
    {
        for scope in self.stack.iter().rev() {
            if let Some(v) = scope.variables.iter().rev().find(|v| v.name == name) {
                return Some(v);
            }
        }
        self.globals.iter().find(|v| v.name == name)
    }
}

#[cfg(test)]
mod tests
{
    use vsl_symbols::VariableKind;

    use super::*;

    fn private(name: &str, registry: &TypeRegistry) -> Variable
    {
        Variable {
            name: name.to_string(),
            kind: VariableKind::Private,
            data_type: registry.get_builtin("float").unwrap(),
            array_size: 1,
            access: Access::RW,
            extra: VariableExtra::None
        }
    }

    #[test]
    fn reserved_prefix_rejected()
    {
        let reg = TypeRegistry::new();
        let mut mgr = ScopeManager::new();
        let err = mgr.add_global(private("gl_Foo", &reg), &reg).unwrap_err();
        assert_eq!(err, ScopeError::ReservedName("gl_Foo".into()));
    }

    #[test]
    fn builtin_name_collision_rejected()
    {
        let reg = TypeRegistry::new();
        let mut mgr = ScopeManager::new();
        let err = mgr.add_global(private("vec3", &reg), &reg).unwrap_err();
        assert_eq!(err, ScopeError::ReservedName("vec3".into()));
    }

    #[test]
    fn local_shadowing_global_rejected()
    {
        let reg = TypeRegistry::new();
        let mut mgr = ScopeManager::new();
        mgr.add_global(private("x", &reg), &reg).unwrap();
        mgr.push_global_scope(ShaderStages::VERTEX, &reg);
        let err = mgr.declare_local(private("x", &reg)).unwrap_err();
        assert_eq!(err, ScopeError::ShadowsGlobal("x".into()));
    }

    #[test]
    fn lookup_prefers_innermost_scope()
    {
        let reg = TypeRegistry::new();
        let mut mgr = ScopeManager::new();
        mgr.push_global_scope(ShaderStages::VERTEX, &reg);
        mgr.push_scope(ScopeKind::Conditional);
        mgr.declare_local(private("x", &reg)).unwrap();
        assert!(mgr.lookup("x").is_some());
        assert!(mgr.lookup("$VertexIndex").is_some());
        assert!(mgr.lookup("nope").is_none());
    }

    #[test]
    fn in_loop_detects_ancestor_loop_scope()
    {
        let reg = TypeRegistry::new();
        let mut mgr = ScopeManager::new();
        mgr.push_global_scope(ShaderStages::VERTEX, &reg);
        assert!(!mgr.in_loop());
        mgr.push_scope(ScopeKind::Loop);
        mgr.push_scope(ScopeKind::Conditional);
        assert!(mgr.in_loop());
        mgr.pop_scope();
        mgr.pop_scope();
        assert!(!mgr.in_loop());
    }
}
