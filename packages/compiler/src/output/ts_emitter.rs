//! TypeScript Emitter
//!
//! Prints a statement list as one TypeScript module. Every module referenced
//! by an external expression becomes a namespace import numbered in order of
//! first use; exported declarations get the `export` keyword.

use crate::collaborators::OutputEmitter;
use crate::error::{CompileError, CompileResult};
use crate::output::abstract_emitter::{escape_identifier, is_legal_identifier, EmitterVisitorContext};
use crate::output::import_generator::{ImportGenerator, RelativeImportGenerator};
use crate::output::output_ast as o;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct TypeScriptEmitter<G = RelativeImportGenerator> {
    import_generator: G,
}

impl TypeScriptEmitter<RelativeImportGenerator> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: ImportGenerator> TypeScriptEmitter<G> {
    pub fn with_import_generator(import_generator: G) -> Self {
        TypeScriptEmitter { import_generator }
    }
}

impl<G: ImportGenerator> OutputEmitter for TypeScriptEmitter<G> {
    fn emit_statements(
        &self,
        module_url: &str,
        statements: &[o::Statement],
        exported_vars: &[String],
    ) -> CompileResult<String> {
        let mut converter = TsEmitterVisitor::new(module_url, exported_vars);
        let mut ctx = EmitterVisitorContext::create_root();
        for stmt in statements {
            converter
                .visit_statement(stmt, &mut ctx)
                .map_err(|message| CompileError::Emit {
                    module_url: module_url.to_string(),
                    message,
                })?;
        }

        let mut src_parts: Vec<String> = converter
            .imports_with_prefixes
            .iter()
            .map(|(imported_module_url, prefix)| {
                format!(
                    "import * as {} from '{}';",
                    prefix,
                    self.import_generator
                        .get_import_path(module_url, imported_module_url)
                )
            })
            .collect();
        src_parts.push(ctx.to_source());
        Ok(src_parts.join("\n"))
    }
}

type EmitResult = Result<(), String>;

struct TsEmitterVisitor<'a> {
    module_url: &'a str,
    exported_vars: &'a [String],
    imports_with_prefixes: IndexMap<String, String>,
}

impl<'a> TsEmitterVisitor<'a> {
    fn new(module_url: &'a str, exported_vars: &'a [String]) -> Self {
        TsEmitterVisitor {
            module_url,
            exported_vars,
            imports_with_prefixes: IndexMap::new(),
        }
    }

    fn print_export(&self, name: &str, ctx: &mut EmitterVisitorContext) {
        if self.exported_vars.iter().any(|v| v == name) {
            ctx.print("export ");
        }
    }

    fn visit_statement(&mut self, stmt: &o::Statement, ctx: &mut EmitterVisitorContext) -> EmitResult {
        match stmt {
            o::Statement::DeclareVar(s) => {
                self.print_export(&s.name, ctx);
                ctx.print(match s.modifiers {
                    o::StmtModifier::Final => "const ",
                    o::StmtModifier::None => "var ",
                });
                ctx.print(&escape_identifier(&s.name, false, false));
                if let Some(type_) = &s.type_ {
                    ctx.print(":");
                    self.visit_type(type_, ctx)?;
                }
                if let Some(value) = &s.value {
                    ctx.print(" = ");
                    self.visit_expression(value, ctx)?;
                }
                ctx.println(";");
            }
            o::Statement::DeclareFn(s) => {
                self.print_export(&s.name, ctx);
                ctx.print("function ");
                ctx.print(&escape_identifier(&s.name, false, false));
                ctx.print("(");
                self.visit_params(&s.params, ctx)?;
                ctx.print(")");
                if let Some(type_) = &s.type_ {
                    ctx.print(":");
                    self.visit_type(type_, ctx)?;
                }
                ctx.println(" {");
                ctx.inc_indent();
                for statement in &s.statements {
                    self.visit_statement(statement, ctx)?;
                }
                ctx.dec_indent();
                ctx.println("}");
            }
            o::Statement::Expression(s) => {
                self.visit_expression(&s.expr, ctx)?;
                ctx.println(";");
            }
            o::Statement::Return(s) => {
                ctx.print("return ");
                self.visit_expression(&s.value, ctx)?;
                ctx.println(";");
            }
        }
        Ok(())
    }

    fn visit_expression(&mut self, expr: &o::Expression, ctx: &mut EmitterVisitorContext) -> EmitResult {
        match expr {
            o::Expression::ReadVar(e) => ctx.print(&e.name),
            o::Expression::Literal(e) => ctx.print(&literal_to_source(&e.value)),
            o::Expression::LiteralArray(e) => {
                ctx.print("[");
                self.visit_all_expressions(&e.entries, ctx)?;
                ctx.print("]");
            }
            o::Expression::LiteralMap(e) => {
                ctx.print("{");
                for (i, entry) in e.entries.iter().enumerate() {
                    if i > 0 {
                        ctx.print(",");
                    }
                    let quote = entry.quoted || !is_legal_identifier(&entry.key);
                    ctx.print(&escape_identifier(&entry.key, false, quote));
                    ctx.print(":");
                    self.visit_expression(&entry.value, ctx)?;
                }
                ctx.print("}");
            }
            o::Expression::External(e) => {
                self.visit_external(&e.value, ctx);
                self.visit_type_params(e.type_params.as_deref(), ctx)?;
            }
            o::Expression::Placeholder(e) => {
                return Err(format!("unresolved placeholder {}", e.id));
            }
            o::Expression::ReadProp(e) => {
                self.visit_expression(&e.receiver, ctx)?;
                ctx.print(".");
                ctx.print(&e.name);
            }
            o::Expression::InvokeFunction(e) => {
                self.visit_expression(&e.fn_, ctx)?;
                ctx.print("(");
                self.visit_all_expressions(&e.args, ctx)?;
                ctx.print(")");
            }
            o::Expression::Instantiate(e) => {
                ctx.print("new ");
                self.visit_expression(&e.class_expr, ctx)?;
                ctx.print("(");
                self.visit_all_expressions(&e.args, ctx)?;
                ctx.print(")");
            }
            o::Expression::Function(e) => {
                ctx.print("function(");
                self.visit_params(&e.params, ctx)?;
                ctx.print(")");
                if let Some(type_) = &e.type_ {
                    ctx.print(":");
                    self.visit_type(type_, ctx)?;
                }
                ctx.println(" {");
                ctx.inc_indent();
                for statement in &e.statements {
                    self.visit_statement(statement, ctx)?;
                }
                ctx.dec_indent();
                ctx.print("}");
            }
        }
        Ok(())
    }

    fn visit_all_expressions(&mut self, exprs: &[o::Expression], ctx: &mut EmitterVisitorContext) -> EmitResult {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                ctx.print(",");
            }
            self.visit_expression(expr, ctx)?;
        }
        Ok(())
    }

    fn visit_params(&mut self, params: &[o::FnParam], ctx: &mut EmitterVisitorContext) -> EmitResult {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                ctx.print(",");
            }
            ctx.print(&escape_identifier(&param.name, false, false));
            if let Some(type_) = &param.type_ {
                ctx.print(":");
                self.visit_type(type_, ctx)?;
            }
        }
        Ok(())
    }

    fn visit_external(&mut self, value: &o::ExternalReference, ctx: &mut EmitterVisitorContext) {
        if let Some(module_name) = value.module_name.as_deref() {
            if module_name != self.module_url {
                let next_index = self.imports_with_prefixes.len();
                let prefix = self
                    .imports_with_prefixes
                    .entry(module_name.to_string())
                    .or_insert_with(|| format!("import{}", next_index));
                ctx.print(&format!("{}.", prefix));
            }
        }
        ctx.print(&value.name);
    }

    fn visit_type_params(&mut self, params: Option<&[o::Type]>, ctx: &mut EmitterVisitorContext) -> EmitResult {
        match params {
            Some(params) if !params.is_empty() => {
                ctx.print("<");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        ctx.print(",");
                    }
                    self.visit_type(param, ctx)?;
                }
                ctx.print(">");
            }
            _ => {}
        }
        Ok(())
    }

    fn visit_type(&mut self, type_: &o::Type, ctx: &mut EmitterVisitorContext) -> EmitResult {
        match type_ {
            o::Type::Builtin(t) => ctx.print(match t.name {
                o::BuiltinTypeName::Dynamic | o::BuiltinTypeName::Inferred => "any",
                o::BuiltinTypeName::Bool => "boolean",
                o::BuiltinTypeName::Int | o::BuiltinTypeName::Number => "number",
                o::BuiltinTypeName::String => "string",
                o::BuiltinTypeName::Function => "Function",
                o::BuiltinTypeName::None => "void",
            }),
            o::Type::Expression(t) => {
                self.visit_expression(&t.value, ctx)?;
                self.visit_type_params(t.type_params.as_deref(), ctx)?;
            }
            o::Type::Array(t) => {
                self.visit_type(&t.of, ctx)?;
                ctx.print("[]");
            }
        }
        Ok(())
    }
}

fn literal_to_source(value: &o::LiteralValue) -> String {
    match value {
        o::LiteralValue::Null => "null".to_string(),
        o::LiteralValue::Bool(b) => b.to_string(),
        o::LiteralValue::Number(n) if n.is_infinite() => {
            let sign = if n.is_sign_negative() { "-" } else { "" };
            format!("{}Infinity", sign)
        }
        o::LiteralValue::Number(n) => n.to_string(),
        o::LiteralValue::String(s) => escape_identifier(s, true, true),
    }
}
