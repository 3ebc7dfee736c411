//! Declaration lines for classes, callables, properties and types.

use crate::code::{CodeLine, Xref};
use crate::model::{
    AccessorDecl, ClassDecl, ContainerDecl, Declaration, FunctionDecl, Parameter, PropertyDecl,
    Signature, TypeAliasDecl, TypeExpr, TypeLiteral, TypeParam,
};

/// Append a type expression.
pub fn push_type(line: &mut CodeLine, ty: &TypeExpr) {
    match ty {
        TypeExpr::Intrinsic(name) | TypeExpr::TypeParameter(name) | TypeExpr::Unknown(name) => {
            line.plain(name);
        }
        TypeExpr::Reference { name, id, args } => {
            let target = id.map_or_else(|| Xref::Name(name.clone()), Xref::Id);
            line.reference(target, name);
            if !args.is_empty() {
                line.plain("<");
                push_joined(line, args, ", ");
                line.plain(">");
            }
        }
        TypeExpr::Array(element) => {
            let needs_parens = matches!(
                **element,
                TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::Reflection(_)
            );
            if needs_parens {
                line.plain("(");
            }
            push_type(line, element);
            line.plain(if needs_parens { ")[]" } else { "[]" });
        }
        TypeExpr::Union(types) => push_joined(line, types, " | "),
        TypeExpr::Intersection(types) => push_joined(line, types, " & "),
        TypeExpr::Tuple(types) => {
            line.plain("[");
            push_joined(line, types, ", ");
            line.plain("]");
        }
        TypeExpr::StringLiteral(value) => {
            line.literal(&format!("\"{value}\""));
        }
        TypeExpr::Literal(value) => {
            line.literal(value);
        }
        TypeExpr::TypeOperator { operator, target } => {
            line.keyword(operator).plain(" ");
            push_type(line, target);
        }
        TypeExpr::Reflection(literal) => push_type_literal(line, literal),
    }
}

fn push_joined(line: &mut CodeLine, types: &[TypeExpr], separator: &str) {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            line.plain(separator);
        }
        push_type(line, ty);
    }
}

fn push_type_literal(line: &mut CodeLine, literal: &TypeLiteral) {
    if let Some(signature) = literal.signatures.first() {
        push_type_params(line, &signature.type_parameters);
        push_params(line, &signature.parameters);
        line.plain(" => ");
        match &signature.return_type {
            Some(ty) => push_type(line, ty),
            None => {
                line.plain("void");
            }
        }
        return;
    }
    if literal.members.is_empty() {
        line.plain("{}");
        return;
    }
    line.plain("{ ");
    for (i, member) in literal.members.iter().enumerate() {
        if i > 0 {
            line.plain("; ");
        }
        line.param(&member.name);
        if member.optional {
            line.plain("?");
        }
        line.plain(": ");
        match &member.ty {
            Some(ty) => push_type(line, ty),
            None => {
                line.plain("any");
            }
        }
    }
    line.plain(" }");
}

fn push_type_params(line: &mut CodeLine, params: &[TypeParam]) {
    if params.is_empty() {
        return;
    }
    line.plain("<");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            line.plain(", ");
        }
        line.plain(&param.name);
        if let Some(constraint) = &param.constraint {
            line.plain(" ").keyword("extends").plain(" ");
            push_type(line, constraint);
        }
    }
    line.plain(">");
}

fn push_params(line: &mut CodeLine, params: &[Parameter]) {
    line.plain("(");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            line.plain(", ");
        }
        if param.rest {
            line.plain("...");
        }
        line.param(&param.name);
        if param.optional || param.default_value.is_some() {
            line.plain("?");
        }
        if let Some(ty) = &param.ty {
            line.plain(": ");
            push_type(line, ty);
        }
    }
    line.plain(")");
}

fn push_return(line: &mut CodeLine, signature: &Signature) {
    if let Some(ty) = &signature.return_type {
        line.plain(": ");
        push_type(line, ty);
    }
}

fn push_heritage(line: &mut CodeLine, keyword: &str, types: &[TypeExpr]) {
    if types.is_empty() {
        return;
    }
    line.plain(" ").keyword(keyword).plain(" ");
    push_joined(line, types, ", ");
}

/// `class Name<T> extends Base implements Iface`
#[must_use]
pub fn class_line(class: &ClassDecl, interface: bool) -> CodeLine {
    let mut line = CodeLine::new();
    line.keyword(if interface { "interface" } else { "class" })
        .plain(" ")
        .name(&class.info.name);
    push_type_params(&mut line, &class.type_parameters);
    push_heritage(&mut line, "extends", &class.extends);
    push_heritage(&mut line, "implements", &class.implements);
    line
}

/// One line per call signature of a function, method or constructor.
#[must_use]
pub fn callable_lines(decl: &Declaration, function: &FunctionDecl) -> Vec<CodeLine> {
    function
        .signatures
        .iter()
        .map(|signature| {
            let mut line = CodeLine::new();
            match decl {
                Declaration::Function(_) => {
                    line.keyword("function").plain(" ").name(&function.info.name);
                }
                Declaration::Constructor(_) => {
                    line.keyword("constructor");
                }
                _ => {
                    if function.info.is_static {
                        line.keyword("static").plain(" ");
                    }
                    if function.info.is_protected {
                        line.keyword("protected").plain(" ");
                    }
                    line.name(&function.info.name);
                }
            }
            push_type_params(&mut line, &signature.type_parameters);
            push_params(&mut line, &signature.parameters);
            if !matches!(decl, Declaration::Constructor(_)) {
                push_return(&mut line, signature);
            }
            line
        })
        .collect()
}

/// `name?: Type` for properties, `const name: Type = value` for variables.
#[must_use]
pub fn property_line(property: &PropertyDecl, variable: bool) -> CodeLine {
    let mut line = CodeLine::new();
    if variable {
        line.keyword("const").plain(" ");
    } else if property.info.is_static {
        line.keyword("static").plain(" ");
    }
    line.name(&property.info.name);
    if property.optional {
        line.plain("?");
    }
    if let Some(ty) = &property.ty {
        line.plain(": ");
        push_type(&mut line, ty);
    }
    if variable && let Some(value) = &property.default_value {
        line.plain(" = ").literal(value.trim());
    }
    line
}

/// `get name(): Type` and `set name(value: Type)`.
#[must_use]
pub fn accessor_lines(accessor: &AccessorDecl) -> Vec<CodeLine> {
    let mut lines = Vec::new();
    if let Some(getter) = &accessor.getter {
        let mut line = CodeLine::new();
        line.keyword("get").plain(" ").name(&accessor.info.name).plain("()");
        push_return(&mut line, getter);
        lines.push(line);
    }
    if let Some(setter) = &accessor.setter {
        let mut line = CodeLine::new();
        line.keyword("set").plain(" ").name(&accessor.info.name);
        push_params(&mut line, &setter.parameters);
        lines.push(line);
    }
    lines
}

/// `type Name<T> = Type`
#[must_use]
pub fn type_alias_line(alias: &TypeAliasDecl) -> CodeLine {
    let mut line = CodeLine::new();
    line.keyword("type").plain(" ").name(&alias.info.name);
    push_type_params(&mut line, &alias.type_parameters);
    line.plain(" = ");
    match &alias.ty {
        Some(ty) => push_type(&mut line, ty),
        None => {
            line.plain("any");
        }
    }
    line
}

/// `const name = { key: value, ... }`
#[must_use]
pub fn object_literal_line(object: &ContainerDecl) -> CodeLine {
    let mut line = CodeLine::new();
    line.keyword("const")
        .plain(" ")
        .name(&object.info.name)
        .plain(" = {");
    let mut first = true;
    for member in &object.members {
        line.plain(if first { " " } else { ", " });
        first = false;
        line.param(member.name());
        match member {
            Declaration::Property(p) | Declaration::Variable(p) => {
                if let Some(value) = &p.default_value {
                    line.plain(": ").literal(value.trim());
                } else if let Some(ty) = &p.ty {
                    line.plain(": ");
                    push_type(&mut line, ty);
                }
            }
            Declaration::Method(_) | Declaration::Function(_) => {
                line.plain("()");
            }
            _ => {}
        }
    }
    line.plain(if first { "}" } else { " }" });
    line
}
