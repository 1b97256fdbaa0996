// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures: Go sources, schema files and templates

use sqlgen_ir::{GoType, Param, StructRegistry, StructShape};

/// Sample Go source files
pub struct GoFixtures;

impl GoFixtures {
    /// Interface file with one method per template feature
    pub const fn querier_interface() -> &'static str {
        r#"package iface

import (
	"time"

	"gorm.io/gen"
)

// Querier holds hand-written queries
type Querier interface {
	// FindByID query a user by id
	//
	// SELECT * FROM @@table WHERE id = @id
	FindByID(id int) (gen.T, error)

	// FilterWithNameAndRole filter by optional name and role
	//
	// SELECT * FROM @@table
	// {{where}}
	//   {{if name != ""}} name = @name {{end}}
	//   {{if role != ""}} AND role = @role {{end}}
	// {{end}}
	FilterWithNameAndRole(name, role string) ([]gen.T, error)

	// UpdateName
	//
	// update @@table {{set}}{{if name!=""}}name=@name{{end}},{{if id>0}}id=@id{{end}}{{end}} where id=@id
	UpdateName(name string, id int) (gen.RowsAffected, error)

	// sql(SELECT * FROM @@table WHERE created_at > @since)
	CreatedAfter(since time.Time) ([]*gen.T, error)

	// where(name IN @names)
	FindByNames(names []string) ([]gen.T, error)

	// SELECT * FROM @@table {{where}}{{for _, name := range names}} OR name = @name{{end}}{{end}}
	FindAnyName(names ...string) ([]gen.T, error)

	// SELECT @@col FROM @@table LIMIT 1
	PluckColumn(col string) (gen.M, error)
}
"#
    }

    /// Interface mixing valid and invalid methods
    pub const fn mixed_interface() -> &'static str {
        r#"package iface

import "gorm.io/gen"

type Mixed interface {
	// SELECT * FROM @@table WHERE id = @id
	Good(id int) (gen.T, error)

	// SELECT * FROM @@table WHERE id = @missing
	Unresolved(id int) (gen.T, error)

	// SELECT * FROM @@table {{if id > 0}} WHERE id = @id
	Unclosed(id int) (gen.T, error)

	// SELECT * FROM @@table
	TwoResults() (gen.T, gen.T, error)
}
"#
    }

    /// Model structs with tags, pointers and an embedded field
    pub const fn model_structs() -> &'static str {
        r#"package model

import "time"

// User is a registered account
type User struct {
	ID        int64     `gorm:"column:id;primaryKey" json:"id"`
	Name      string    `gorm:"column:name" json:"name"`
	Age       int       `json:"age"`
	Address   *Address
	CreatedAt time.Time
	Meta
	password  string
}

type Address struct {
	City string
	Zip  string
}
"#
    }

    /// Interface with a Go syntax error in its method list
    pub const fn broken_source() -> &'static str {
        "package iface\n\ntype Broken interface {\n\tFind(id int (gen.T, error)\n}\n"
    }
}

/// Schema files for the static catalog
pub struct SchemaFixtures;

impl SchemaFixtures {
    pub const fn users_yaml() -> &'static str {
        r#"tables:
  - name: users
    comment: registered users
    columns:
      - name: id
        type: bigint
        primary_key: true
        auto_increment: true
      - name: name
        type: varchar(64)
      - name: age
        type: int
      - name: role
        type: varchar(16)
      - name: created_at
        type: datetime
      - name: deleted_at
        type: datetime
        nullable: true
"#
    }
}

/// Templates and the parameters they are compiled against
pub struct TemplateFixtures;

impl TemplateFixtures {
    pub const fn select_table() -> &'static str {
        "select * from @@table"
    }

    pub const fn where_if() -> &'static str {
        r#"select * from @@table {{where}}{{if name != ""}} name=@name{{end}}{{end}}"#
    }

    pub const fn set_update() -> &'static str {
        r#"update @@table {{set}}{{if name!=""}}name=@name{{end}},{{if id>0}}id=@id{{end}}{{end}} where id=@id"#
    }

    pub const fn for_names() -> &'static str {
        "select * from @@table {{where}}{{for _,name:=range names}} or name=@name{{end}}{{end}}"
    }

    pub const fn nested_users() -> &'static str {
        "select * from @@table {{where}}{{for i, member := range users}}{{for _, tag := range tags}} or (name=@member.Name and tag=@tag){{end}}{{end}}{{end}}"
    }

    pub const fn quoted_column() -> &'static str {
        "select @@col from @@table where id=@id"
    }

    /// Method parameters used by the template fixtures
    pub fn params() -> Vec<Param> {
        vec![
            Param::new("id", GoType::named("int")),
            Param::new("name", GoType::named("string")),
            Param::new("role", GoType::named("string")),
            Param::new("col", GoType::named("string")),
            Param::new("cols", GoType::slice(GoType::named("string"))),
            Param::new("names", GoType::slice(GoType::named("string"))),
            Param::new("tags", GoType::slice(GoType::named("string"))),
            Param::new("attrs", GoType::string_map()),
            Param::new(
                "users",
                GoType::slice(GoType::pointer(Self::user_type())),
            ),
        ]
    }

    pub fn user_type() -> GoType {
        GoType::qualified("model", "User")
    }

    /// Registry knowing the shape of `model.User`
    pub fn structs() -> StructRegistry {
        let mut registry = StructRegistry::new();
        registry.insert(
            Self::user_type(),
            StructShape::new(
                "User",
                vec![
                    Param::new("ID", GoType::named("int64")),
                    Param::new("Name", GoType::named("string")),
                    Param::new("Age", GoType::named("int")),
                ],
            ),
        );
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_struct_is_registered() {
        let registry = TemplateFixtures::structs();
        let shape = registry
            .lookup(&GoType::pointer(TemplateFixtures::user_type()))
            .unwrap();
        assert!(shape.field("Name").is_some());
    }
}
