pub const SCHEMA: &str = r#"
-- Accounts. Never deleted in any form; every owned resource points here.
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,     -- argon2id hash with embedded salt
    nickname TEXT NOT NULL DEFAULT '',
    bio TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

-- Config fragments, owned by exactly one user.
CREATE TABLE IF NOT EXISTS configs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(id),
    kind INTEGER NOT NULL,           -- 1 = global, 2 = lesson
    name TEXT NOT NULL,
    content TEXT NOT NULL,
    format INTEGER NOT NULL,         -- 1 = json, 2 = toml
    remark TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    modified_at TEXT NOT NULL,
    deleted INTEGER NOT NULL DEFAULT 0
);

-- Durable share records. No owner column: ownership derives from the
-- referenced config. Revocation is the deleted flag, nothing cascades.
CREATE TABLE IF NOT EXISTS config_shares (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    config_id INTEGER NOT NULL REFERENCES configs(id),
    remark TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    deleted INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(id),
    name TEXT NOT NULL,
    remark TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    modified_at TEXT NOT NULL,       -- bumped on field edits and membership changes
    deleted INTEGER NOT NULL DEFAULT 0
);

-- Direct plan membership. The primary key is the concurrency backstop:
-- the loser of a duplicate-add race hits it and reports Conflict.
CREATE TABLE IF NOT EXISTS plan_config_relations (
    plan_id INTEGER NOT NULL REFERENCES plans(id),
    config_id INTEGER NOT NULL REFERENCES configs(id),
    PRIMARY KEY (plan_id, config_id)
);

-- Membership through another owner's share.
CREATE TABLE IF NOT EXISTS plan_config_share_relations (
    plan_id INTEGER NOT NULL REFERENCES plans(id),
    config_share_id INTEGER NOT NULL REFERENCES config_shares(id),
    PRIMARY KEY (plan_id, config_share_id)
);

CREATE TABLE IF NOT EXISTS plan_shares (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_id INTEGER NOT NULL REFERENCES plans(id),
    remark TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    deleted INTEGER NOT NULL DEFAULT 0
);

-- Session tokens. One intended live row per user; login replaces.
CREATE TABLE IF NOT EXISTS login_tokens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    token TEXT NOT NULL UNIQUE,      -- uuid v4, dashes stripped
    expires_at TEXT NOT NULL
);

-- Anonymous generation tokens. No expiry; capped at 30 per plan.
CREATE TABLE IF NOT EXISTS plan_tokens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plan_id INTEGER NOT NULL REFERENCES plans(id),
    token TEXT NOT NULL UNIQUE,      -- uuid v4, dashes stripped
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_favorite_configs (
    user_id INTEGER NOT NULL REFERENCES users(id),
    config_share_id INTEGER NOT NULL REFERENCES config_shares(id),
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, config_share_id)
);

CREATE TABLE IF NOT EXISTS user_favorite_plans (
    user_id INTEGER NOT NULL REFERENCES users(id),
    plan_share_id INTEGER NOT NULL REFERENCES plan_shares(id),
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, plan_share_id)
);

CREATE INDEX IF NOT EXISTS idx_configs_owner ON configs(owner_id);
CREATE INDEX IF NOT EXISTS idx_config_shares_config ON config_shares(config_id);
CREATE INDEX IF NOT EXISTS idx_plans_owner ON plans(owner_id);
CREATE INDEX IF NOT EXISTS idx_plan_shares_plan ON plan_shares(plan_id);
CREATE INDEX IF NOT EXISTS idx_login_tokens_user ON login_tokens(user_id);
CREATE INDEX IF NOT EXISTS idx_plan_tokens_plan ON plan_tokens(plan_id);
"#;
