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

//! End-to-end scenarios built by hand-constructing a `vsl-ast` tree (there is
//! no parser in this workspace) and feeding it straight to the analyzer.

use vsl_ast::{
    AssignOp, BindingDecl, ControlKeyword, Expr, InputDecl, LValue, LiteralValue, ShaderFile, ShaderKind, Span, StageFunction, Statement
};
use vsl_compiler::analyzer::analyze;
use vsl_compiler::Config;
use vsl_types::ShaderStages;

fn span() -> Span
{
    Span::new(2, 1)
}

fn empty_file() -> ShaderFile
{
    ShaderFile { kind: ShaderKind::Graphics, structs: vec![], inputs: vec![], outputs: vec![], uniform: None, bindings: vec![], subpass_inputs: vec![], locals: vec![], stages: vec![] }
}

/// Scenario 1: a minimal identity vertex shader produces one reflected
/// input, the expected `gl_Position` assignment, and non-empty SPIR-V.
#[test]
fn minimal_identity_vertex()
{
    let mut file = empty_file();
    file.inputs.push(InputDecl { location: 0, name: "pos".into(), type_name: "vec3".into(), array_size: 1, span: span() });
    file.stages.push(StageFunction {
        stage: ShaderStages::VERTEX,
        body: vec![Statement::Assign {
            target: LValue::Swizzle { name: "$Position".into(), components: "xyzw".into(), span: span() },
            op: AssignOp::Assign,
            value: Expr::Call {
                name: "vec4".into(),
                args: vec![Expr::Name { name: "pos".into(), span: span() }, Expr::Literal { value: LiteralValue::Float(1.0), span: span() }],
                span: span()
            },
            span: span()
        }],
        span: span()
    });

    let compiled = analyze(&file, &Config::default()).unwrap();
    assert_eq!(compiled.info.inputs.len(), 1);
    assert_eq!(compiled.info.inputs[0].location, 0);
    let (_, src) = &compiled.stage_sources[0];
    assert!(src.contains("layout(location=0) in vec3 pos;"));
    assert!(src.contains("gl_Position = vec4(pos, 1.0);"));

    let driver = vsl_compiler::SpirvCompiler::new(true).expect("shaderc backend available");
    use vsl_compiler::SpirvDriver;
    let words = driver.compile(src, ShaderStages::VERTEX, "main").unwrap();
    assert!(!words.is_empty());
}

/// Scenario 2: a local variable that shadows an input is rejected.
#[test]
fn shadowed_name_rejected()
{
    let mut file = empty_file();
    file.inputs.push(InputDecl { location: 0, name: "x".into(), type_name: "float".into(), array_size: 1, span: Span::new(1, 1) });
    file.stages.push(StageFunction {
        stage: ShaderStages::VERTEX,
        body: vec![Statement::VarDecl {
            name: "x".into(),
            type_name: "float".into(),
            array_size: 1,
            init: Some(Expr::Literal { value: LiteralValue::Float(1.0), span: span() }),
            span: span()
        }],
        span: span()
    });

    let err = analyze(&file, &Config::default()).unwrap_err();
    assert_eq!(err.span.line, 2);
    assert!(err.message.contains("shadow"));
}

/// Scenario 3: two bindings claiming the same slot is rejected, with the
/// second declaration's name carried as the offending text.
#[test]
fn binding_slot_duplicate_rejected()
{
    let mut file = empty_file();
    file.bindings.push(BindingDecl { slot: 3, name: "first".into(), type_name: "sampler2D".into(), span: Span::new(1, 1) });
    file.bindings.push(BindingDecl { slot: 3, name: "second".into(), type_name: "sampler2D".into(), span: span() });

    let err = analyze(&file, &Config::default()).unwrap_err();
    assert_eq!(err.bad_text, "second");
}

/// Scenario 4: a write-swizzle that repeats a component is rejected.
#[test]
fn swizzle_write_with_repeat_rejected()
{
    let mut file = empty_file();
    file.locals.push(vsl_ast::LocalDecl { name: "v".into(), type_name: "vec4".into(), flat: false, source_stage: ShaderStages::VERTEX, dest_stage: ShaderStages::FRAGMENT, span: Span::new(1, 1) });
    file.stages.push(StageFunction {
        stage: ShaderStages::VERTEX,
        body: vec![Statement::Assign {
            target: LValue::Swizzle { name: "v".into(), components: "xx".into(), span: span() },
            op: AssignOp::Assign,
            value: Expr::Call {
                name: "vec2".into(),
                args: vec![Expr::Literal { value: LiteralValue::Float(0.0), span: span() }, Expr::Literal { value: LiteralValue::Float(0.0), span: span() }],
                span: span()
            },
            span: span()
        }],
        span: span()
    });

    let err = analyze(&file, &Config::default()).unwrap_err();
    assert!(err.message.contains("repeat"));
}

/// Scenario 5: a `mat4` input at location 2 reserves locations 2..=5, so a
/// later input declared at location 3 collides with it.
#[test]
fn matrix_input_consumes_multiple_locations()
{
    let mut file = empty_file();
    file.inputs.push(InputDecl { location: 2, name: "m".into(), type_name: "mat4".into(), array_size: 1, span: Span::new(1, 1) });
    file.inputs.push(InputDecl { location: 3, name: "q".into(), type_name: "float".into(), array_size: 1, span: span() });

    let err = analyze(&file, &Config::default()).unwrap_err();
    assert!(err.message.contains('3'));
    assert!(err.message.contains("already used"));
}

/// Scenario 6: `discard` used outside the fragment stage is rejected.
#[test]
fn discard_outside_fragment_rejected()
{
    let mut file = empty_file();
    file.stages.push(StageFunction {
        stage: ShaderStages::VERTEX,
        body: vec![Statement::Control { keyword: ControlKeyword::Discard, span: span() }],
        span: span()
    });

    let err = analyze(&file, &Config::default()).unwrap_err();
    assert!(err.message.contains("stage"));
}
