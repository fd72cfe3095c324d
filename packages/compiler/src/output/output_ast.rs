//! Output AST Module
//!
//! Target-language independent statement tree produced by the style and view
//! compilers and printed by an output emitter.
//!
//! References to artifacts whose final location is not known yet are written
//! as [`Expression::Placeholder`]. A placeholder only carries an id; the
//! dependency list returned next to the statements says what it stands for.

use std::fmt;

//// Types

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeModifier {
    None = 0,
    Const = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTypeName {
    Dynamic,
    Bool,
    String,
    Int,
    Number,
    Function,
    Inferred,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinType {
    pub name: BuiltinTypeName,
    pub modifiers: TypeModifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionType {
    pub value: Box<Expression>,
    pub modifiers: TypeModifier,
    pub type_params: Option<Vec<Type>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub of: Box<Type>,
    pub modifiers: TypeModifier,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Builtin(BuiltinType),
    Expression(ExpressionType),
    Array(ArrayType),
}

impl Type {
    pub fn modifiers(&self) -> TypeModifier {
        match self {
            Type::Builtin(t) => t.modifiers,
            Type::Expression(t) => t.modifiers,
            Type::Array(t) => t.modifiers,
        }
    }

    pub fn has_modifier(&self, modifier: TypeModifier) -> bool {
        self.modifiers() as u8 & modifier as u8 != 0
    }
}

fn builtin(name: BuiltinTypeName) -> Type {
    Type::Builtin(BuiltinType {
        name,
        modifiers: TypeModifier::None,
    })
}

pub fn dynamic_type() -> Type {
    builtin(BuiltinTypeName::Dynamic)
}

pub fn bool_type() -> Type {
    builtin(BuiltinTypeName::Bool)
}

pub fn string_type() -> Type {
    builtin(BuiltinTypeName::String)
}

pub fn number_type() -> Type {
    builtin(BuiltinTypeName::Number)
}

pub fn function_type() -> Type {
    builtin(BuiltinTypeName::Function)
}

pub fn array_type(of: Type) -> Type {
    Type::Array(ArrayType {
        of: Box::new(of),
        modifiers: TypeModifier::None,
    })
}

/// Type reference to an external symbol, e.g. `ComponentFactory<MyComp>`.
pub fn import_type(
    id: ExternalReference,
    type_params: Option<Vec<Type>>,
    modifiers: TypeModifier,
) -> Type {
    Type::Expression(ExpressionType {
        value: import_expr(id, None),
        modifiers,
        type_params,
    })
}

///// Expressions

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Number(value as f64)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

/// A symbol living in some module.
///
/// `module_name` is `None` for symbols of the module being emitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalReference {
    pub module_name: Option<String>,
    pub name: String,
}

impl ExternalReference {
    pub fn new(module_name: impl Into<String>, name: impl Into<String>) -> Self {
        ExternalReference {
            module_name: Some(module_name.into()),
            name: name.into(),
        }
    }
}

/// Identity of an unresolved reference inside one compile result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderId(pub usize);

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadVarExpr {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralArrayExpr {
    pub entries: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapEntry {
    pub key: String,
    pub value: Box<Expression>,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapExpr {
    pub entries: Vec<LiteralMapEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalExpr {
    pub value: ExternalReference,
    pub type_params: Option<Vec<Type>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderExpr {
    pub id: PlaceholderId,
    pub type_params: Option<Vec<Type>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeFunctionExpr {
    pub fn_: Box<Expression>,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstantiateExpr {
    pub class_expr: Box<Expression>,
    pub args: Vec<Expression>,
    pub type_: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub name: String,
    pub type_: Option<Type>,
}

impl FnParam {
    pub fn new(name: impl Into<String>, type_: Option<Type>) -> Self {
        FnParam {
            name: name.into(),
            type_,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    pub type_: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    ReadVar(ReadVarExpr),
    Literal(LiteralExpr),
    LiteralArray(LiteralArrayExpr),
    LiteralMap(LiteralMapExpr),
    External(ExternalExpr),
    Placeholder(PlaceholderExpr),
    ReadProp(ReadPropExpr),
    InvokeFunction(InvokeFunctionExpr),
    Instantiate(InstantiateExpr),
    Function(FunctionExpr),
}

impl Expression {
    pub fn prop(self: Box<Self>, name: impl Into<String>) -> Box<Expression> {
        Box::new(Expression::ReadProp(ReadPropExpr {
            receiver: self,
            name: name.into(),
        }))
    }

    pub fn call_fn(self: Box<Self>, args: Vec<Expression>) -> Box<Expression> {
        Box::new(Expression::InvokeFunction(InvokeFunctionExpr { fn_: self, args }))
    }

    pub fn instantiate(self: Box<Self>, args: Vec<Expression>, type_: Option<Type>) -> Box<Expression> {
        Box::new(Expression::Instantiate(InstantiateExpr {
            class_expr: self,
            args,
            type_,
        }))
    }

    pub fn to_stmt(self: Box<Self>) -> Statement {
        Statement::Expression(ExpressionStatement { expr: self })
    }

    /// Rebuild this expression bottom-up, handing every node to `f` once its
    /// children have been rebuilt. Expressions nested in types are included.
    pub fn transform<F>(self, f: &mut F) -> Expression
    where
        F: FnMut(Expression) -> Expression,
    {
        let rebuilt = match self {
            Expression::LiteralArray(e) => Expression::LiteralArray(LiteralArrayExpr {
                entries: transform_all(e.entries, f),
            }),
            Expression::LiteralMap(e) => Expression::LiteralMap(LiteralMapExpr {
                entries: e
                    .entries
                    .into_iter()
                    .map(|entry| LiteralMapEntry {
                        key: entry.key,
                        value: Box::new(entry.value.transform(f)),
                        quoted: entry.quoted,
                    })
                    .collect(),
            }),
            Expression::External(e) => Expression::External(ExternalExpr {
                value: e.value,
                type_params: transform_type_params(e.type_params, f),
            }),
            Expression::Placeholder(e) => Expression::Placeholder(PlaceholderExpr {
                id: e.id,
                type_params: transform_type_params(e.type_params, f),
            }),
            Expression::ReadProp(e) => Expression::ReadProp(ReadPropExpr {
                receiver: Box::new(e.receiver.transform(f)),
                name: e.name,
            }),
            Expression::InvokeFunction(e) => Expression::InvokeFunction(InvokeFunctionExpr {
                fn_: Box::new(e.fn_.transform(f)),
                args: transform_all(e.args, f),
            }),
            Expression::Instantiate(e) => Expression::Instantiate(InstantiateExpr {
                class_expr: Box::new(e.class_expr.transform(f)),
                args: transform_all(e.args, f),
                type_: e.type_.map(|t| t.transform(f)),
            }),
            Expression::Function(e) => Expression::Function(FunctionExpr {
                params: transform_params(e.params, f),
                statements: e.statements.into_iter().map(|s| s.transform(f)).collect(),
                type_: e.type_.map(|t| t.transform(f)),
            }),
            leaf @ (Expression::ReadVar(_) | Expression::Literal(_)) => leaf,
        };
        f(rebuilt)
    }

    /// Visit this expression and every nested one, including those in types.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Expression),
    {
        f(self);
        match self {
            Expression::LiteralArray(e) => e.entries.iter().for_each(|x| x.walk(f)),
            Expression::LiteralMap(e) => e.entries.iter().for_each(|x| x.value.walk(f)),
            Expression::External(ExternalExpr { type_params, .. })
            | Expression::Placeholder(PlaceholderExpr { type_params, .. }) => {
                type_params.iter().flatten().for_each(|t| t.walk(f))
            }
            Expression::ReadProp(e) => e.receiver.walk(f),
            Expression::InvokeFunction(e) => {
                e.fn_.walk(f);
                e.args.iter().for_each(|x| x.walk(f));
            }
            Expression::Instantiate(e) => {
                e.class_expr.walk(f);
                e.args.iter().for_each(|x| x.walk(f));
                e.type_.iter().for_each(|t| t.walk(f));
            }
            Expression::Function(e) => {
                e.params.iter().filter_map(|p| p.type_.as_ref()).for_each(|t| t.walk(f));
                e.statements.iter().for_each(|s| s.walk(f));
                e.type_.iter().for_each(|t| t.walk(f));
            }
            Expression::ReadVar(_) | Expression::Literal(_) => {}
        }
    }
}

impl Type {
    pub fn transform<F>(self, f: &mut F) -> Type
    where
        F: FnMut(Expression) -> Expression,
    {
        match self {
            Type::Builtin(t) => Type::Builtin(t),
            Type::Expression(t) => Type::Expression(ExpressionType {
                value: Box::new(t.value.transform(f)),
                modifiers: t.modifiers,
                type_params: transform_type_params(t.type_params, f),
            }),
            Type::Array(t) => Type::Array(ArrayType {
                of: Box::new(t.of.transform(f)),
                modifiers: t.modifiers,
            }),
        }
    }

    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Expression),
    {
        match self {
            Type::Builtin(_) => {}
            Type::Expression(t) => {
                t.value.walk(f);
                t.type_params.iter().flatten().for_each(|p| p.walk(f));
            }
            Type::Array(t) => t.of.walk(f),
        }
    }
}

fn transform_all<F>(exprs: Vec<Expression>, f: &mut F) -> Vec<Expression>
where
    F: FnMut(Expression) -> Expression,
{
    exprs.into_iter().map(|e| e.transform(f)).collect()
}

fn transform_type_params<F>(params: Option<Vec<Type>>, f: &mut F) -> Option<Vec<Type>>
where
    F: FnMut(Expression) -> Expression,
{
    params.map(|types| types.into_iter().map(|t| t.transform(f)).collect())
}

fn transform_params<F>(params: Vec<FnParam>, f: &mut F) -> Vec<FnParam>
where
    F: FnMut(Expression) -> Expression,
{
    params
        .into_iter()
        .map(|p| FnParam {
            name: p.name,
            type_: p.type_.map(|t| t.transform(f)),
        })
        .collect()
}

///// Statements

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtModifier {
    None = 0,
    Final = 1,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    DeclareVar(DeclareVarStmt),
    DeclareFn(DeclareFunctionStmt),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareVarStmt {
    pub name: String,
    pub value: Option<Box<Expression>>,
    pub type_: Option<Type>,
    pub modifiers: StmtModifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareFunctionStmt {
    pub name: String,
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    pub type_: Option<Type>,
    pub modifiers: StmtModifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Box<Expression>,
}

impl Statement {
    pub fn transform<F>(self, f: &mut F) -> Statement
    where
        F: FnMut(Expression) -> Expression,
    {
        match self {
            Statement::DeclareVar(s) => Statement::DeclareVar(DeclareVarStmt {
                name: s.name,
                value: s.value.map(|v| Box::new(v.transform(f))),
                type_: s.type_.map(|t| t.transform(f)),
                modifiers: s.modifiers,
            }),
            Statement::DeclareFn(s) => Statement::DeclareFn(DeclareFunctionStmt {
                name: s.name,
                params: transform_params(s.params, f),
                statements: s.statements.into_iter().map(|st| st.transform(f)).collect(),
                type_: s.type_.map(|t| t.transform(f)),
                modifiers: s.modifiers,
            }),
            Statement::Expression(s) => Statement::Expression(ExpressionStatement {
                expr: Box::new(s.expr.transform(f)),
            }),
            Statement::Return(s) => Statement::Return(ReturnStatement {
                value: Box::new(s.value.transform(f)),
            }),
        }
    }

    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Expression),
    {
        match self {
            Statement::DeclareVar(s) => {
                s.value.iter().for_each(|v| v.walk(f));
                s.type_.iter().for_each(|t| t.walk(f));
            }
            Statement::DeclareFn(s) => {
                s.params.iter().filter_map(|p| p.type_.as_ref()).for_each(|t| t.walk(f));
                s.statements.iter().for_each(|st| st.walk(f));
                s.type_.iter().for_each(|t| t.walk(f));
            }
            Statement::Expression(s) => s.expr.walk(f),
            Statement::Return(s) => s.value.walk(f),
        }
    }
}

// Helper functions for creating common expressions
pub fn variable(name: impl Into<String>) -> Box<Expression> {
    Box::new(Expression::ReadVar(ReadVarExpr { name: name.into() }))
}

pub fn literal(value: impl Into<LiteralValue>) -> Box<Expression> {
    Box::new(Expression::Literal(LiteralExpr {
        value: value.into(),
    }))
}

pub fn null_expr() -> Box<Expression> {
    Box::new(Expression::Literal(LiteralExpr {
        value: LiteralValue::Null,
    }))
}

pub fn literal_arr(entries: Vec<Expression>) -> Box<Expression> {
    Box::new(Expression::LiteralArray(LiteralArrayExpr { entries }))
}

pub fn literal_map(entries: Vec<LiteralMapEntry>) -> Box<Expression> {
    Box::new(Expression::LiteralMap(LiteralMapExpr { entries }))
}

pub fn import_expr(id: ExternalReference, type_params: Option<Vec<Type>>) -> Box<Expression> {
    Box::new(Expression::External(ExternalExpr {
        value: id,
        type_params,
    }))
}

pub fn placeholder(id: PlaceholderId) -> Box<Expression> {
    Box::new(Expression::Placeholder(PlaceholderExpr {
        id,
        type_params: None,
    }))
}

pub fn fn_expr(params: Vec<FnParam>, statements: Vec<Statement>, type_: Option<Type>) -> Box<Expression> {
    Box::new(Expression::Function(FunctionExpr {
        params,
        statements,
        type_,
    }))
}

pub fn declare_var(
    name: impl Into<String>,
    value: Box<Expression>,
    type_: Option<Type>,
    modifiers: StmtModifier,
) -> Statement {
    Statement::DeclareVar(DeclareVarStmt {
        name: name.into(),
        value: Some(value),
        type_,
        modifiers,
    })
}

pub fn declare_fn(
    name: impl Into<String>,
    params: Vec<FnParam>,
    statements: Vec<Statement>,
    type_: Option<Type>,
) -> Statement {
    Statement::DeclareFn(DeclareFunctionStmt {
        name: name.into(),
        params,
        statements,
        type_,
        modifiers: StmtModifier::None,
    })
}

pub fn return_stmt(value: Box<Expression>) -> Statement {
    Statement::Return(ReturnStatement { value })
}

/// Every placeholder id still present in `statements`, in source order.
pub fn collect_placeholders(statements: &[Statement]) -> Vec<PlaceholderId> {
    let mut ids = Vec::new();
    for stmt in statements {
        stmt.walk(&mut |expr| {
            if let Expression::Placeholder(p) = expr {
                ids.push(p.id);
            }
        });
    }
    ids
}
