//! Initial schema: clients, campaigns, budgets and results.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(TABLES_SQL).await?;
        db.execute_unprepared(INDEXES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const TABLES_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL,
    department VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_client_name_not_blank CHECK (length(trim(name)) > 0)
);

CREATE TABLE campaigns (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE RESTRICT,
    name VARCHAR(200) NOT NULL,
    total_budget NUMERIC(15, 2) NOT NULL DEFAULT 0,
    start_year INTEGER NOT NULL,
    start_month INTEGER NOT NULL,
    end_year INTEGER,
    end_month INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_campaign_total_budget CHECK (total_budget >= 0),
    CONSTRAINT chk_campaign_start_month CHECK (start_month BETWEEN 1 AND 12),
    CONSTRAINT chk_campaign_end_month CHECK (end_month IS NULL OR end_month BETWEEN 1 AND 12),
    CONSTRAINT chk_campaign_end_pair CHECK ((end_year IS NULL) = (end_month IS NULL)),
    CONSTRAINT chk_campaign_period CHECK (
        end_year IS NULL OR (end_year, end_month) >= (start_year, start_month)
    )
);

-- One budget row per composite key
CREATE TABLE budgets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    campaign_id UUID NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    platform VARCHAR(100) NOT NULL,
    operation_type VARCHAR(100) NOT NULL,
    budget_type VARCHAR(100) NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    target_kpi VARCHAR(100),
    target_value NUMERIC(15, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_budgets_key UNIQUE (campaign_id, year, month, platform, operation_type, budget_type),
    CONSTRAINT chk_budget_month CHECK (month BETWEEN 1 AND 12),
    CONSTRAINT chk_budget_amount CHECK (amount >= 0),
    CONSTRAINT chk_budget_target CHECK (target_value IS NULL OR target_value >= 0)
);

-- Results share the budget key shape but are recorded independently
CREATE TABLE results (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    campaign_id UUID NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    platform VARCHAR(100) NOT NULL,
    operation_type VARCHAR(100) NOT NULL,
    budget_type VARCHAR(100) NOT NULL,
    actual_spend NUMERIC(15, 2) NOT NULL DEFAULT 0,
    actual_result NUMERIC(15, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_results_key UNIQUE (campaign_id, year, month, platform, operation_type, budget_type),
    CONSTRAINT chk_result_month CHECK (month BETWEEN 1 AND 12),
    CONSTRAINT chk_result_spend CHECK (actual_spend >= 0),
    CONSTRAINT chk_result_value CHECK (actual_result >= 0)
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_clients_department ON clients(department);
CREATE INDEX idx_campaigns_client ON campaigns(client_id);
CREATE INDEX idx_budgets_period ON budgets(year DESC, month DESC);
CREATE INDEX idx_budgets_platform ON budgets(platform);
CREATE INDEX idx_results_period ON results(year DESC, month DESC);
CREATE INDEX idx_results_platform ON results(platform);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS results CASCADE;
DROP TABLE IF EXISTS budgets CASCADE;
DROP TABLE IF EXISTS campaigns CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
";
