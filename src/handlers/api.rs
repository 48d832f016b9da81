use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::config::ImportConfig;
use crate::error::AppError;
use crate::import::{ApiImportSummary, ImportError, ImportOutcome};
use crate::models::*;
use crate::services::{ImportEntry, ImportService, WinnerService};
use crate::utils::{EXCEL_FIELD, read_multipart};

const PUBLIC_LIST_DEFAULT_LIMIT: u64 = 20;
const PUBLIC_LIST_MAX_LIMIT: u64 = 100;

#[utoipa::path(
    get,
    path = "/winners",
    tag = "winners",
    security(("bearer_auth" = [])),
    params(WinnerListQuery),
    responses(
        (status = 200, description = "中奖者分页列表（完整字段）"),
        (status = 401, description = "未登录")
    )
)]
pub async fn list_winners(
    winner_service: web::Data<WinnerService>,
    import_config: web::Data<ImportConfig>,
    query: web::Query<WinnerListQuery>,
) -> Result<HttpResponse> {
    match winner_service
        .list(&query, import_config.api_page_size)
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/winners/public",
    tag = "winners",
    params(PublicListQuery),
    responses((status = 200, description = "已审核中奖者（手机号脱敏）", body = [PublicWinner]))
)]
pub async fn public_winners(
    winner_service: web::Data<WinnerService>,
    query: web::Query<PublicListQuery>,
) -> Result<HttpResponse> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(PUBLIC_LIST_DEFAULT_LIMIT)
        .min(PUBLIC_LIST_MAX_LIMIT);

    match winner_service.list_by_status(&["Approved"], limit).await {
        Ok(list) => {
            let winners: Vec<PublicWinner> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": winners
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

/// 导入结果直接作为响应体（不套 success / data）
fn import_response(result: Result<ImportOutcome, ImportError>) -> HttpResponse {
    match result {
        Ok(outcome) => HttpResponse::Ok().json(outcome.api_summary()),
        Err(ImportError::EmptyFile) => HttpResponse::Ok().json(ApiImportSummary {
            message: ImportError::EmptyFile.to_string(),
            imported: 0,
            errors: Vec::new(),
            total: 0,
        }),
        Err(e) => AppError::SpreadsheetError(e.to_string()).error_response(),
    }
}

/// 批量导入：有失败行也返回 200，失败行记录在 errors 中
#[utoipa::path(
    post,
    path = "/winners/upload",
    tag = "winners",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "excelFile: .xlsx / .xls"),
    responses(
        (status = 200, description = "导入完成", body = ApiImportSummary),
        (status = 400, description = "未上传文件或文件无法解析")
    )
)]
pub async fn upload_winners(
    import_service: web::Data<ImportService>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = match read_multipart(payload, import_service.max_excel_bytes()).await {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };
    let Some(file) = form.take_file(EXCEL_FIELD) else {
        return Ok(AppError::ValidationError("No file uploaded".to_string()).error_response());
    };

    match import_service.import_upload(&file, ImportEntry::Api).await {
        Ok(result) => Ok(import_response(result)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/winners/{id}",
    tag = "winners",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "中奖者主键")),
    request_body = UpdateWinnerRequest,
    responses(
        (status = 200, description = "更新成功", body = WinnerResponse),
        (status = 404, description = "不存在")
    )
)]
pub async fn update_winner(
    winner_service: web::Data<WinnerService>,
    path: web::Path<i64>,
    request: web::Json<UpdateWinnerRequest>,
) -> Result<HttpResponse> {
    match winner_service
        .update(path.into_inner(), request.into_inner())
        .await
    {
        Ok(winner) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": winner
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/winners/{id}",
    tag = "winners",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "中奖者主键")),
    responses(
        (status = 200, description = "已删除"),
        (status = 404, description = "不存在")
    )
)]
pub async fn delete_winner(
    winner_service: web::Data<WinnerService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match winner_service.soft_delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Winner deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "winners",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "中奖者统计", body = WinnerStats))
)]
pub async fn stats(winner_service: web::Data<WinnerService>) -> Result<HttpResponse> {
    match winner_service.stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/winners", web::get().to(list_winners))
        .route("/winners/public", web::get().to(public_winners))
        .route("/winners/upload", web::post().to(upload_winners))
        .route("/winners/{id}", web::put().to(update_winner))
        .route("/winners/{id}", web::delete().to(delete_winner))
        .route("/stats", web::get().to(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::RowRejection;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_import_summary_is_top_level() {
        let mut outcome = ImportOutcome::new(3);
        outcome.record_success();
        outcome.record_success();
        outcome.record_failure(2, &RowRejection::MissingFields);

        let resp = import_response(Ok(outcome));
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["message"], "Import completed");
        assert_eq!(body["imported"], 2);
        assert_eq!(body["total"], 3);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
        assert!(body.get("data").is_none());
        assert!(body.get("success").is_none());
    }

    #[actix_web::test]
    async fn test_empty_file_is_zero_summary() {
        let resp = import_response(Err(ImportError::EmptyFile));
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["message"], "Excel file is empty or has no data");
        assert_eq!(body["imported"], 0);
        assert_eq!(body["total"], 0);
        assert_eq!(body["errors"], serde_json::json!([]));
        assert!(body.get("data").is_none());
    }

    #[actix_web::test]
    async fn test_decode_failure_is_bad_request() {
        let resp = import_response(Err(ImportError::Decode("bad zip".to_string())));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
