// Settlement endpoints
//
// The daily and monthly lookups are not wrapped in an envelope by the
// backend; both shapes are accepted here.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http_client::ApiHttpClient;
use crate::models::settlement::{DailySettlement, MonthlySettlement, PdfDocument, YearMonth};
use crate::models::Envelope;

const SETTLEMENTS: &str = "settlements";

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeEnveloped<T> {
    Enveloped(Envelope<T>),
    Bare(T),
}

impl<T> MaybeEnveloped<T> {
    fn into_inner(self) -> Result<T, ApiError> {
        match self {
            MaybeEnveloped::Enveloped(envelope) => envelope.into_data(),
            MaybeEnveloped::Bare(value) => Ok(value),
        }
    }
}

async fn fetch<T: DeserializeOwned>(
    client: &ApiHttpClient,
    builder: reqwest::RequestBuilder,
) -> Result<T, ApiError> {
    client
        .send_json::<MaybeEnveloped<T>>(builder)
        .await?
        .into_inner()
}

/// Daily purchase totals for a store
pub async fn daily(client: &ApiHttpClient, store_id: i64, date: NaiveDate) -> Result<DailySettlement, ApiError> {
    let date = date.format("%Y-%m-%d").to_string();
    fetch(
        client,
        client
            .get(&[SETTLEMENTS, "daily"])
            .query(&[("storeId", store_id.to_string()), ("date", date)]),
    )
    .await
}

/// Monthly settlement for a store
pub async fn monthly(
    client: &ApiHttpClient,
    store_id: i64,
    year_month: YearMonth,
) -> Result<MonthlySettlement, ApiError> {
    fetch(
        client,
        client.get(&[SETTLEMENTS, "monthly"]).query(&[
            ("storeId", store_id.to_string()),
            ("yearMonth", year_month.to_string()),
        ]),
    )
    .await
}

/// Download the monthly statement PDF
#[tracing::instrument(skip(client), fields(year_month = %year_month))]
pub async fn download_monthly_pdf(
    client: &ApiHttpClient,
    store_id: i64,
    year_month: YearMonth,
) -> Result<PdfDocument, ApiError> {
    let body = client
        .send_binary(client.get(&[SETTLEMENTS, "monthly", "download"]).query(&[
            ("storeId", store_id.to_string()),
            ("yearMonth", year_month.to_string()),
        ]))
        .await?;

    let file_name = body
        .file_name
        .unwrap_or_else(|| format!("settlement_{}.pdf", year_month));

    tracing::info!(file_name = %file_name, size = body.bytes.len(), "Settlement PDF downloaded");

    Ok(PdfDocument {
        file_name,
        bytes: body.bytes,
    })
}

/// Generate the daily settlement for a store
pub async fn generate(client: &ApiHttpClient, store_id: i64, date: NaiveDate) -> Result<(), ApiError> {
    let date = date.format("%Y-%m-%d").to_string();
    let _: Value = client
        .send_json(
            client
                .post(&[SETTLEMENTS, "generate"])
                .query(&[("storeId", store_id.to_string()), ("date", date)]),
        )
        .await?;
    tracing::info!(store_id = store_id, "Settlement generated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maybe_enveloped_both_shapes() {
        let bare = json!({"orderCount": 2, "dailyAmount": 3000, "monthlyAccumulatedAmount": 9000});
        let parsed: MaybeEnveloped<DailySettlement> = serde_json::from_value(bare.clone()).unwrap();
        assert_eq!(parsed.into_inner().unwrap().order_count, 2);

        let wrapped = json!({"success": true, "data": bare});
        let parsed: MaybeEnveloped<DailySettlement> = serde_json::from_value(wrapped).unwrap();
        assert_eq!(parsed.into_inner().unwrap().daily_amount, 3000.0);
    }
}
