//! Compact source-like rendering of expressions.
//!
//! Symbol names live in the table, so rendering takes an optional
//! [`SymbolTable`]; without one, symbol references fall back to their raw
//! keys. Mirrors the source closely enough for diagnostics and tests.
use std::fmt;

use crate::{
    expr::{
        BinaryOp, ComplexPartKind, DescriptorField, Expr, ParamValue, ProcedureRef,
        RelationalOp, Subscript, Triplet, UnaryOp,
    },
    symbol::{SymbolId, SymbolTable},
};

impl Expr {
    /// Render this expression, resolving symbol names through `table` when
    /// one is given.
    pub fn fmt<'a>(&'a self, table: Option<&'a SymbolTable>) -> impl fmt::Display + 'a {
        pub struct Fmt<'a> {
            expr: &'a Expr,
            table: Option<&'a SymbolTable>,
        }

        impl fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_expr(f, self.expr, self.table)
            }
        }

        Fmt { expr: self, table }
    }
}

fn write_symbol(
    f: &mut fmt::Formatter<'_>,
    id: SymbolId,
    table: Option<&SymbolTable>,
) -> fmt::Result {
    match table {
        Some(table) => write!(f, "{}", table.symbol(id).name),
        None => write!(f, "sym({:?})", id),
    }
}

fn write_subscript(
    f: &mut fmt::Formatter<'_>,
    subscript: &Subscript,
    table: Option<&SymbolTable>,
) -> fmt::Result {
    match subscript {
        Subscript::Element(e) => write_expr(f, e, table),
        Subscript::Triplet(t) => write_triplet(f, t, table),
    }
}

fn write_triplet(
    f: &mut fmt::Formatter<'_>,
    triplet: &Triplet,
    table: Option<&SymbolTable>,
) -> fmt::Result {
    if let Some(lower) = &triplet.lower {
        write_expr(f, lower, table)?;
    }
    write!(f, ":")?;
    if let Some(upper) = &triplet.upper {
        write_expr(f, upper, table)?;
    }
    if let Some(stride) = &triplet.stride {
        write!(f, ":")?;
        write_expr(f, stride, table)?;
    }
    Ok(())
}

fn write_list<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Expr>,
    table: Option<&SymbolTable>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write_expr(f, item, table)?;
    }
    Ok(())
}

fn proc_name<'a>(proc: &'a ProcedureRef, table: Option<&'a SymbolTable>) -> Option<&'a str> {
    match proc {
        ProcedureRef::Resolved(id) => table.map(|t| t.symbol(*id).name.as_str()),
        ProcedureRef::Intrinsic(intrinsic) => Some(intrinsic.name.as_str()),
    }
}

fn write_expr(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr,
    table: Option<&SymbolTable>,
) -> fmt::Result {
    match expr {
        Expr::Literal(lit) => write!(f, "{}", lit.value),
        Expr::BozLiteral(boz) => write!(f, "z'{:x}'", boz.bits),
        Expr::NullPointer => write!(f, "null()"),
        Expr::StaticDataObject(obj) => write!(f, "{}", obj.name),
        Expr::SymbolRef(id) => write_symbol(f, *id, table),
        Expr::ArrayRef(x) => {
            write_symbol(f, x.base, table)?;
            write!(f, "(")?;
            for (i, s) in x.subscripts.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write_subscript(f, s, table)?;
            }
            write!(f, ")")
        }
        Expr::CoarrayRef(x) => {
            write_symbol(f, x.base, table)?;
            if !x.subscripts.is_empty() {
                write!(f, "(")?;
                for (i, s) in x.subscripts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write_subscript(f, s, table)?;
                }
                write!(f, ")")?;
            }
            write!(f, "[")?;
            write_list(f, &x.cosubscripts, table)?;
            write!(f, "]")
        }
        Expr::Component(x) => {
            write_expr(f, &x.base, table)?;
            write!(f, "%")?;
            write_symbol(f, x.component, table)
        }
        Expr::Substring(x) => {
            write_expr(f, &x.parent, table)?;
            write!(f, "(")?;
            if let Some(lower) = &x.lower {
                write_expr(f, lower, table)?;
            }
            write!(f, ":")?;
            if let Some(upper) = &x.upper {
                write_expr(f, upper, table)?;
            }
            write!(f, ")")
        }
        Expr::ComplexPart(x) => {
            write_expr(f, &x.complex, table)?;
            match x.part {
                ComplexPartKind::Re => write!(f, "%re"),
                ComplexPartKind::Im => write!(f, "%im"),
            }
        }
        Expr::Parentheses(inner) => {
            write!(f, "(")?;
            write_expr(f, inner, table)?;
            write!(f, ")")
        }
        Expr::Unary(x) => {
            match x.op {
                UnaryOp::Negate => write!(f, "-")?,
                UnaryOp::Not => write!(f, ".not.")?,
            }
            write_expr(f, &x.operand, table)
        }
        Expr::Binary(x) => {
            let op = match x.op {
                BinaryOp::Add => "+",
                BinaryOp::Subtract => "-",
                BinaryOp::Multiply => "*",
                BinaryOp::Divide => "/",
                BinaryOp::Power => "**",
                BinaryOp::Concat => "//",
                BinaryOp::And => ".and.",
                BinaryOp::Or => ".or.",
            };
            write_expr(f, &x.left, table)?;
            write!(f, "{}", op)?;
            write_expr(f, &x.right, table)
        }
        Expr::Relational(x) => {
            let op = match x.op {
                RelationalOp::Eq => "==",
                RelationalOp::Ne => "/=",
                RelationalOp::Lt => "<",
                RelationalOp::Le => "<=",
                RelationalOp::Gt => ">",
                RelationalOp::Ge => ">=",
            };
            write_expr(f, &x.left, table)?;
            write!(f, "{}", op)?;
            write_expr(f, &x.right, table)
        }
        Expr::FunctionRef(x) => {
            match proc_name(&x.proc, table) {
                Some(name) => write!(f, "{}", name)?,
                None => write!(f, "proc(?)")?,
            }
            write!(f, "(")?;
            write_list(f, &x.args, table)?;
            write!(f, ")")
        }
        Expr::StructureCtor(x) => {
            write!(f, "{}(", x.type_name)?;
            write_list(f, &x.values, table)?;
            write!(f, ")")
        }
        Expr::ArrayCtor(x) => {
            write!(f, "[")?;
            write_list(f, &x.elements, table)?;
            write!(f, "]")
        }
        Expr::TypeParamInquiry(x) => {
            if let Some(base) = &x.base {
                write_expr(f, base, table)?;
                write!(f, "%")?;
            }
            write!(f, "{}", x.parameter)
        }
        Expr::DescriptorInquiry(x) => {
            let field = match x.field {
                DescriptorField::LowerBound => "lbound",
                DescriptorField::UpperBound => "ubound",
                DescriptorField::Extent => "size",
                DescriptorField::Rank => "rank",
                DescriptorField::Len => "len",
            };
            write!(f, "{}(", field)?;
            write_symbol(f, x.base, table)?;
            write!(f, ",dim={})", x.dimension + 1)
        }
        Expr::ParamValue(x) => match x {
            ParamValue::Deferred => write!(f, ":"),
            ParamValue::Assumed => write!(f, "*"),
            ParamValue::Explicit(e) => write_expr(f, e, table),
        },
        Expr::ProcedureDesignator(proc) => match proc_name(proc, table) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "proc(?)"),
        },
    }
}
