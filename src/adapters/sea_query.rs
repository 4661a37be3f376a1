use std::any::Any;

use sea_orm::sea_query::{
    Alias, ColumnRef, Condition, Expr, IntoColumnRef, Order, SelectStatement, SimpleExpr,
};
use sea_orm::{EntityTrait, QueryTrait, Select};

use crate::builder::{Adaptable, QueryBuilder};
use crate::conditions::{Operator, SortDirection, WhereClause, WhereInCondition};
use crate::errors::QueryFilterError;

/// Applies criteria onto a sea-query [`SelectStatement`].
///
/// Columns may be qualified as `table.column`. Values are bound as string parameters.
pub struct SeaQueryAdapter<'a> {
    statement: &'a mut SelectStatement,
}

impl<'a> SeaQueryAdapter<'a> {
    pub fn new(statement: &'a mut SelectStatement) -> Self {
        Self { statement }
    }

    pub fn statement(&mut self) -> &mut SelectStatement {
        &mut *self.statement
    }
}

fn column_ref(name: &str) -> ColumnRef {
    match name.split_once('.') {
        Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
        None => Alias::new(name).into_column_ref(),
    }
}

fn expression(clause: &WhereClause) -> Result<SimpleExpr, QueryFilterError> {
    let column = Expr::col(column_ref(clause.column()));
    let operator = clause.operator();

    let Some(value) = clause.value() else {
        return match operator {
            Operator::Equal => Ok(column.is_null()),
            Operator::NotEqual => Ok(column.is_not_null()),
            _ => Err(QueryFilterError::InvalidOperatorForNull { operator }),
        };
    };

    let value = value.to_string();
    Ok(match operator {
        Operator::Equal => column.eq(value),
        Operator::NotEqual => column.ne(value),
        Operator::GreaterThan => column.gt(value),
        Operator::GreaterThanOrEqual => column.gte(value),
        Operator::LessThan => column.lt(value),
        Operator::LessThanOrEqual => column.lte(value),
        Operator::Like => column.like(value),
        Operator::NotLike => column.not_like(value),
    })
}

impl QueryBuilder for SeaQueryAdapter<'_> {
    fn where_conditions(&mut self, conditions: Vec<WhereClause>) -> Result<(), QueryFilterError> {
        let mut clauses = conditions.iter();
        let Some(first) = clauses.next() else {
            return Ok(());
        };

        // the first member always starts the group, whatever its tag
        let mut group = Condition::all().add(expression(first)?);
        for clause in clauses {
            let expr = expression(clause)?;
            group = if clause.is_or() {
                Condition::any().add(group).add(expr)
            } else {
                Condition::all().add(group).add(expr)
            };
        }

        self.statement.cond_where(group);
        Ok(())
    }

    fn where_in(&mut self, condition: WhereInCondition) -> Result<(), QueryFilterError> {
        let values = condition.values().iter().cloned();
        self.statement
            .and_where(Expr::col(column_ref(condition.column())).is_in(values));
        Ok(())
    }

    fn sort(&mut self, column: &str, direction: SortDirection) -> Result<(), QueryFilterError> {
        let order = match direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };
        self.statement.order_by(column_ref(column), order);
        Ok(())
    }

    fn select(&mut self, columns: &[String]) -> Result<(), QueryFilterError> {
        for column in columns {
            match column.split_once(" as ") {
                Some((name, alias)) => {
                    self.statement
                        .expr_as(Expr::col(column_ref(name.trim())), Alias::new(alias.trim()));
                }
                None => {
                    self.statement.column(column_ref(column.trim()));
                }
            }
        }
        Ok(())
    }

    fn inner_mut(&mut self) -> &mut dyn Any {
        &mut *self.statement
    }
}

impl Adaptable for SelectStatement {
    fn query_builder(&mut self) -> Box<dyn QueryBuilder + '_> {
        Box::new(SeaQueryAdapter::new(self))
    }
}

/// Entity selects are filtered through their underlying statement, which is also what
/// [`QueryBuilder::inner_mut`] hands out.
impl<E> Adaptable for Select<E>
where
    E: EntityTrait + 'static,
{
    fn query_builder(&mut self) -> Box<dyn QueryBuilder + '_> {
        Box::new(SeaQueryAdapter::new(QueryTrait::query(self)))
    }
}
