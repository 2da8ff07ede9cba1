//! CSV rendering of reconciled line items.

use rust_decimal::Decimal;

use adbudget_shared::types::format_fixed2;

use super::error::TransferError;
use crate::reconciliation::LineItem;

/// Column order of the export file.
pub const EXPORT_COLUMNS: [&str; 16] = [
    "campaignId",
    "campaignName",
    "clientName",
    "year",
    "month",
    "platform",
    "operationType",
    "budgetType",
    "budgetAmount",
    "targetKpi",
    "targetValue",
    "actualSpend",
    "actualResult",
    "budgetUtilization",
    "roi",
    "variance",
];

fn amount(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

fn row(item: &LineItem) -> [String; 16] {
    [
        item.campaign_id.to_string(),
        item.campaign.name.clone(),
        item.campaign.client.name.clone(),
        item.year.to_string(),
        item.month.to_string(),
        item.platform.clone(),
        item.operation_type.clone(),
        item.budget_type.clone().unwrap_or_default(),
        amount(item.budget_amount),
        item.target_kpi.clone().unwrap_or_default(),
        amount(item.target_value),
        amount(item.actual_spend),
        amount(item.actual_result),
        format_fixed2(item.budget_utilization),
        format_fixed2(item.roi),
        format_fixed2(item.variance),
    ]
}

/// Writes `items` as CSV with a header row, in the order given.
pub fn export_csv(items: &[LineItem]) -> Result<Vec<u8>, TransferError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for item in items {
        writer.write_record(row(item))?;
    }
    writer
        .into_inner()
        .map_err(|e| TransferError::Flush(e.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use adbudget_shared::types::{BudgetId, CampaignId, ClientId, KeyGranularity, ResultId};

    use crate::reconciliation::{
        BudgetRecord, CampaignInfo, ClientInfo, ReconciliationService, ResultRecord,
    };

    fn campaign() -> CampaignInfo {
        CampaignInfo {
            id: CampaignId::from_uuid(Uuid::from_u128(7)),
            name: "Spring, Sale".to_string(),
            client: ClientInfo {
                id: ClientId::new(),
                name: "Acme".to_string(),
                department: None,
            },
        }
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let out = export_csv(&[]).unwrap();
        assert_eq!(lines(&out), vec![EXPORT_COLUMNS.join(",")]);
    }

    #[test]
    fn test_export_formats_metrics_and_blanks() {
        let c = campaign();
        let budgets = vec![BudgetRecord {
            id: BudgetId::new(),
            campaign: c.clone(),
            year: 2024,
            month: 1,
            platform: "Google".to_string(),
            operation_type: "運用代行".to_string(),
            budget_type: "通常".to_string(),
            amount: dec!(100000),
            target_kpi: None,
            target_value: None,
        }];
        let results = vec![ResultRecord {
            id: ResultId::new(),
            campaign: c.clone(),
            year: 2024,
            month: 1,
            platform: "Google".to_string(),
            operation_type: "運用代行".to_string(),
            budget_type: "通常".to_string(),
            actual_spend: dec!(80000),
            actual_result: dec!(240000),
        }];
        let items = ReconciliationService::reconcile(&budgets, &results, KeyGranularity::Full);

        let out = export_csv(&items).unwrap();
        let rows = lines(&out);

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            format!(
                "{},\"Spring, Sale\",Acme,2024,1,Google,運用代行,通常,100000,,,80000,240000,80.00,200.00,20000.00",
                c.id
            )
        );
    }

    #[test]
    fn test_export_result_only_row() {
        let c = campaign();
        let results = vec![ResultRecord {
            id: ResultId::new(),
            campaign: c,
            year: 2024,
            month: 2,
            platform: "Meta".to_string(),
            operation_type: "広告費".to_string(),
            budget_type: "通常".to_string(),
            actual_spend: dec!(1000.5),
            actual_result: dec!(0),
        }];
        let items = ReconciliationService::reconcile(&[], &results, KeyGranularity::Operation);

        let out = export_csv(&items).unwrap();
        let mut reader = csv::Reader::from_reader(out.as_slice());
        let record = reader.records().next().unwrap().unwrap();

        assert_eq!(&record[7], "");
        assert_eq!(&record[8], "");
        assert_eq!(&record[11], "1000.5");
        assert_eq!(&record[13], "0.00");
        assert_eq!(&record[14], "-100.00");
        assert_eq!(&record[15], "0.00");
    }
}
