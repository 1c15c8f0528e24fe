//! The seed routines for the platform, in declaration order.
//!
//! Every routine reads the rows its dependencies left in the context, writes
//! through the shared [`Database`] handle with upserts, and returns the rows
//! it stored under its own context key.
use anyhow::Context as _;
use seedflow::{Context, Registry, SeedError};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::Database;

const ROLES: [&str; 8] = [
    "Super Administrador",
    "Administrador",
    "Instructor",
    "Estudiante",
    "Reclutador",
    "Empresa",
    "Soporte",
    "Invitado",
];

#[derive(Debug, Deserialize)]
struct Role {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct User {
    id: u64,
    email: String,
    #[serde(rename = "roleId")]
    role_id: u64,
}

#[derive(Debug, Deserialize)]
struct Row {
    id: u64,
    slug: String,
}

fn role_id(roles: &[Role], name: &str) -> anyhow::Result<u64> {
    roles
        .iter()
        .find(|role| role.name == name)
        .map(|role| role.id)
        .with_context(|| format!("role '{name}' was not seeded"))
}

fn users_with_role<'a>(users: &'a [User], role: u64) -> impl Iterator<Item = &'a User> {
    users.iter().filter(move |user| user.role_id == role)
}

/// Registers every seed routine. `db` is cloned into each body.
pub fn register(registry: &mut Registry, db: &Database) -> Result<(), SeedError> {
    let conn = db.clone();
    registry.task("roles").run(move |_| {
        let rows = ROLES
            .iter()
            .map(|&name| conn.upsert("roles", name, json!({ "name": name })))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Context::new().with("roles", rows))
    })?;

    let conn = db.clone();
    registry.task("adminUser").after(["roles"]).run(move |ctx| {
        ctx.require(["roles"], "adminUser")?;
        let roles: Vec<Role> = ctx.get_as("roles")?;
        let role = role_id(&roles, "Super Administrador")?;

        let email = "admin@plataforma.test";
        let row = conn.upsert("users", email, json!({ "email": email, "roleId": role }))?;

        Ok(Context::new().with("adminUser", json!({ "id": row["id"], "email": email, "roleId": role })))
    })?;

    let conn = db.clone();
    registry
        .task("users")
        .after(["roles", "adminUser"])
        .run(move |ctx| {
            ctx.require(["roles", "adminUser"], "users")?;
            let roles: Vec<Role> = ctx.get_as("roles")?;

            let people = [
                ("ana@plataforma.test", "Instructor"),
                ("luis@plataforma.test", "Instructor"),
                ("marta@plataforma.test", "Estudiante"),
                ("jorge@plataforma.test", "Estudiante"),
                ("sofia@plataforma.test", "Estudiante"),
                ("carla@plataforma.test", "Reclutador"),
            ];

            let mut rows = vec![ctx.get("adminUser").cloned().unwrap_or_default()];
            for (email, role) in people {
                let role = role_id(&roles, role)?;
                rows.push(conn.upsert("users", email, json!({ "email": email, "roleId": role }))?);
            }

            Ok(Context::new().with("users", rows))
        })?;

    let conn = db.clone();
    registry.task("plans").run(move |_| {
        let plans = [("free", 0), ("monthly", 1990), ("yearly", 19900)];

        let rows = plans
            .iter()
            .map(|&(slug, cents)| {
                conn.upsert("plans", slug, json!({ "slug": slug, "priceCents": cents }))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Context::new().with("plans", rows))
    })?;

    let conn = db.clone();
    registry.task("categories").run(move |_| {
        let rows = ["programacion", "datos", "diseno", "negocios"]
            .iter()
            .map(|&slug| conn.upsert("categories", slug, json!({ "slug": slug })))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Context::new().with("categories", rows))
    })?;

    let conn = db.clone();
    registry
        .task("courses")
        .after(["roles", "users", "categories"])
        .run(move |ctx| {
            ctx.require(["users", "categories"], "courses")?;
            let roles: Vec<Role> = ctx.get_as("roles")?;
            let users: Vec<User> = ctx.get_as("users")?;
            let categories: Vec<Row> = ctx.get_as("categories")?;

            let instructor = role_id(&roles, "Instructor")?;
            let instructors: Vec<&User> = users_with_role(&users, instructor).collect();
            anyhow::ensure!(!instructors.is_empty(), "no instructors to assign courses to");

            let mut rows = Vec::new();
            for (i, category) in categories.iter().enumerate() {
                let slug = format!("intro-{}", category.slug);
                let author = instructors[i % instructors.len()];
                rows.push(conn.upsert(
                    "courses",
                    &slug,
                    json!({ "slug": slug, "categoryId": category.id, "instructorId": author.id }),
                )?);
            }

            Ok(Context::new().with("courses", rows))
        })?;

    let conn = db.clone();
    registry
        .task("subscriptions")
        .after(["roles", "users", "plans"])
        .run(move |ctx| {
            ctx.require(["plans"], "subscriptions")?;
            let roles: Vec<Role> = ctx.get_as("roles")?;
            let users: Vec<User> = ctx.get_as("users")?;
            let plans: Vec<Row> = ctx.get_as("plans")?;

            let student = role_id(&roles, "Estudiante")?;
            let mut rows = Vec::new();
            for (i, user) in users_with_role(&users, student).enumerate() {
                let plan = &plans[i % plans.len()];
                rows.push(conn.upsert(
                    "subscriptions",
                    &user.email,
                    json!({ "userId": user.id, "planId": plan.id }),
                )?);
            }

            Ok(Context::new().with("subscriptions", rows))
        })?;

    let conn = db.clone();
    registry
        .task("certificates")
        .after(["roles", "users", "courses"])
        .run(move |ctx| {
            ctx.require(["courses"], "certificates")?;
            let roles: Vec<Role> = ctx.get_as("roles")?;
            let users: Vec<User> = ctx.get_as("users")?;
            let courses: Vec<Row> = ctx.get_as("courses")?;

            let student = role_id(&roles, "Estudiante")?;
            let mut rows = Vec::new();
            for user in users_with_role(&users, student) {
                let course = &courses[user.id as usize % courses.len()];
                let key = format!("{}/{}", user.email, course.slug);
                rows.push(conn.upsert(
                    "certificates",
                    &key,
                    json!({ "userId": user.id, "courseId": course.id }),
                )?);
            }

            Ok(Context::new().with("certificates", rows))
        })?;

    let conn = db.clone();
    registry
        .task("companies")
        .after(["roles", "users"])
        .run(move |ctx| {
            let roles: Vec<Role> = ctx.get_as("roles")?;
            let users: Vec<User> = ctx.get_as("users")?;

            let recruiter = role_id(&roles, "Reclutador")?;
            let mut rows = Vec::new();
            for user in users_with_role(&users, recruiter) {
                let slug = format!("empresa-{}", user.id);
                rows.push(conn.upsert(
                    "companies",
                    &slug,
                    json!({ "slug": slug, "ownerId": user.id }),
                )?);
            }

            Ok(Context::new().with("companies", rows))
        })?;

    let conn = db.clone();
    registry
        .task("jobPostings")
        .after(["companies", "categories"])
        .run(move |ctx| {
            ctx.require(["companies", "categories"], "jobPostings")?;
            let companies: Vec<Row> = ctx.get_as("companies")?;
            let categories: Vec<Row> = ctx.get_as("categories")?;

            let mut rows: Vec<Value> = Vec::new();
            for company in &companies {
                for category in &categories {
                    let slug = format!("{}-{}", company.slug, category.slug);
                    rows.push(conn.upsert(
                        "job_postings",
                        &slug,
                        json!({ "slug": slug, "companyId": company.id, "categoryId": category.id }),
                    )?);
                }
            }

            Ok(Context::new().with("jobPostings", rows))
        })?;

    Ok(())
}
