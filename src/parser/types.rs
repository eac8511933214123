//! Type syntax.

use super::state::ParserState;
use crate::ast::{Expr, Type, TypeField, types::PRIMITIVE_TYPES};

impl<'a> ParserState<'a> {
    pub(super) fn type_(&mut self) -> Option<Type> {
        self.ambiguous_type().or_else(|| self.complex_type())
    }

    /// `<type>` used as a value.
    pub(super) fn type_literal(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.match_literal("<")?;
            p.ws();
            let value = p.type_()?;
            p.ws();
            p.match_literal(">")?;
            Some(Expr::TypeValue { value })
        })
    }

    pub(super) fn primitive_type_name(&mut self) -> Option<&'static str> {
        PRIMITIVE_TYPES
            .iter()
            .find_map(|name| self.word(name).map(|_| *name))
    }

    fn ambiguous_type(&mut self) -> Option<Type> {
        self.primitive_type_name()
            .map(Type::primitive)
            .or_else(|| self.type_def())
            .or_else(|| self.identifier_name().map(|name| Type::TypeName { name }))
            .or_else(|| self.paren_type())
    }

    /// `name=(type)`
    fn type_def(&mut self) -> Option<Type> {
        self.attempt(|p| {
            let name = p.identifier_name().or_else(|| p.quoted_string())?;
            p.ws();
            p.match_literal("=")?;
            p.ws();
            p.match_literal("(")?;
            p.ws();
            let typ = p.type_()?;
            p.ws();
            p.match_literal(")")?;
            Some(Type::TypeDef {
                name,
                typ: Box::new(typ),
            })
        })
    }

    /// `(type)` or the union `(type,type,...)`.
    fn paren_type(&mut self) -> Option<Type> {
        self.attempt(|p| {
            p.match_literal("(")?;
            p.ws();
            let mut types = p.sep_by1(|p| p.type_(), |p| p.comma())?;
            p.ws();
            p.match_literal(")")?;
            if types.len() == 1 {
                types.pop()
            } else {
                Some(Type::TypeUnion { types })
            }
        })
    }

    fn complex_type(&mut self) -> Option<Type> {
        self.record_type()
            .or_else(|| self.array_type())
            .or_else(|| self.set_type())
            .or_else(|| self.map_type())
    }

    fn record_type(&mut self) -> Option<Type> {
        self.attempt(|p| {
            p.match_literal("{")?;
            p.ws();
            let fields = p.sep_by1(|p| p.type_field(), |p| p.comma()).unwrap_or_default();
            p.ws();
            p.match_literal("}")?;
            Some(Type::TypeRecord { fields })
        })
    }

    fn type_field(&mut self) -> Option<TypeField> {
        self.attempt(|p| {
            let name = p.identifier_name().or_else(|| p.quoted_string())?;
            p.ws();
            p.match_literal(":")?;
            p.ws();
            let typ = p.type_()?;
            Some(TypeField { name, typ })
        })
    }

    fn array_type(&mut self) -> Option<Type> {
        self.attempt(|p| {
            p.match_literal("[")?;
            p.ws();
            let typ = p.type_()?;
            p.ws();
            p.match_literal("]")?;
            Some(Type::TypeArray { typ: Box::new(typ) })
        })
    }

    fn set_type(&mut self) -> Option<Type> {
        self.attempt(|p| {
            p.match_literal("|[")?;
            p.ws();
            let typ = p.type_()?;
            p.ws();
            p.match_literal("]|")?;
            Some(Type::TypeSet { typ: Box::new(typ) })
        })
    }

    fn map_type(&mut self) -> Option<Type> {
        self.attempt(|p| {
            p.match_literal("|{")?;
            p.ws();
            let key = p.type_()?;
            p.ws();
            p.match_literal(":")?;
            p.ws();
            let val = p.type_()?;
            p.ws();
            p.match_literal("}|")?;
            Some(Type::TypeMap {
                key_type: Box::new(key),
                val_type: Box::new(val),
            })
        })
    }
}
