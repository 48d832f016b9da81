use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::AppError;
use crate::models::*;
use crate::services::{CompanyBankService, PrizeService, WinnerService};
use crate::utils::require_phone;

const HOME_RECENT_WINNERS: u64 = 8;
const HOME_PRIZES: u64 = 10;
const SEARCH_LIMIT: u64 = 50;
const SEARCH_MIN_CHARS: usize = 2;
const WINNER_LIST_LIMIT: u64 = 20;
const SEARCH_RESULT_LIMIT: u64 = 20;

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 首页：最近中奖者（任意状态）与有效奖品
#[utoipa::path(
    get,
    path = "/public/home",
    tag = "public",
    responses((status = 200, description = "首页数据"))
)]
pub async fn home(
    winner_service: web::Data<WinnerService>,
    prize_service: web::Data<PrizeService>,
) -> Result<HttpResponse> {
    let recent = match winner_service.recent(HOME_RECENT_WINNERS).await {
        Ok(list) => list,
        Err(e) => return Ok(e.error_response()),
    };
    let prizes = match prize_service.list_active(HOME_PRIZES).await {
        Ok(list) => list,
        Err(e) => return Ok(e.error_response()),
    };

    let recent_winners: Vec<PublicWinner> = recent.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "recentWinners": recent_winners,
            "prizes": prizes
        }
    })))
}

#[utoipa::path(
    post,
    path = "/public/search",
    tag = "public",
    request_body = PhoneSearchRequest,
    responses(
        (status = 200, description = "找到中奖记录", body = WinnerDetailView),
        (status = 400, description = "未填写手机号"),
        (status = 404, description = "没有该手机号的中奖记录")
    )
)]
pub async fn search_by_phone(
    winner_service: web::Data<WinnerService>,
    request: web::Json<PhoneSearchRequest>,
) -> Result<HttpResponse> {
    let phone = match require_phone(request.phone.as_deref()) {
        Ok(phone) => phone,
        Err(e) => return Ok(e.error_response()),
    };

    match winner_service.find_active_by_phone(&phone).await {
        Ok(Some(winner)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": WinnerDetailView::from(winner),
            "message": "Winner details found successfully!"
        }))),
        Ok(None) => Ok(AppError::NotFound(
            "No winner found with this phone number".to_string(),
        )
        .error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

/// 手机号与 W-Code 同时匹配
#[utoipa::path(
    post,
    path = "/public/status",
    tag = "public",
    request_body = StatusCheckRequest,
    responses(
        (status = 200, description = "找到中奖记录", body = WinnerDetailView),
        (status = 400, description = "手机号或 W-Code 未填写"),
        (status = 404, description = "未找到")
    )
)]
pub async fn status(
    winner_service: web::Data<WinnerService>,
    request: web::Json<StatusCheckRequest>,
) -> Result<HttpResponse> {
    let (Some(phone), Some(wcode)) = (non_empty(&request.phone), non_empty(&request.wcode)) else {
        return Ok(AppError::ValidationError(
            "Please enter both phone number and W-Code".to_string(),
        )
        .error_response());
    };

    match winner_service
        .find_active_by_phone_and_wcode(phone, wcode)
        .await
    {
        Ok(Some(winner)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": WinnerDetailView::from(winner),
            "message": "Winner details found successfully!"
        }))),
        Ok(None) => Ok(AppError::NotFound(
            "No winner found with the provided details".to_string(),
        )
        .error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

/// 手机号或 W-Code 任一；两者都有时按手机号查
#[utoipa::path(
    post,
    path = "/public/check-status",
    tag = "public",
    request_body = StatusCheckRequest,
    responses(
        (status = 200, description = "状态信息", body = WinnerStatusView),
        (status = 400, description = "两者均未填写"),
        (status = 404, description = "未找到")
    )
)]
pub async fn check_status(
    winner_service: web::Data<WinnerService>,
    request: web::Json<StatusCheckRequest>,
) -> Result<HttpResponse> {
    let found = match (non_empty(&request.phone), non_empty(&request.wcode)) {
        (Some(phone), _) => winner_service.find_active_by_phone(phone).await,
        (None, Some(wcode)) => winner_service.find_active_by_wcode(wcode).await,
        (None, None) => {
            return Ok(AppError::ValidationError(
                "Please provide either phone number or W-Code".to_string(),
            )
            .error_response());
        }
    };

    match found {
        Ok(Some(winner)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": WinnerStatusView::from(winner)
        }))),
        Ok(None) => Ok(AppError::NotFound(
            "No winner found with the provided information".to_string(),
        )
        .error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/public/winner-details/{wcode}",
    tag = "public",
    params(("wcode" = String, Path, description = "W-Code")),
    responses(
        (status = 200, description = "已审核中奖者详情", body = WinnerDetailView),
        (status = 404, description = "不存在或未审核")
    )
)]
pub async fn winner_details(
    winner_service: web::Data<WinnerService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match winner_service.find_approved_by_wcode(path.trim()).await {
        Ok(Some(winner)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": WinnerDetailView::from(winner)
        }))),
        Ok(None) => Ok(AppError::NotFound("Winner not found".to_string()).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

async fn run_search(
    winner_service: &WinnerService,
    query: &WinnerSearchQuery,
) -> Result<HttpResponse> {
    let needle = query.query.as_deref().map(str::trim).unwrap_or_default();
    if needle.chars().count() < SEARCH_MIN_CHARS {
        return Ok(AppError::ValidationError(
            "Please enter at least 2 characters to search".to_string(),
        )
        .error_response());
    }

    let search_type = query.search_type.unwrap_or_default();
    match winner_service
        .search_approved(needle, search_type, SEARCH_LIMIT)
        .await
    {
        Ok(list) => {
            let winners: Vec<PublicWinner> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": {
                    "count": winners.len(),
                    "query": needle,
                    "winners": winners
                }
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/public/search-winners",
    tag = "public",
    params(WinnerSearchQuery),
    responses(
        (status = 200, description = "已审核中奖者搜索结果", body = [PublicWinner]),
        (status = 400, description = "关键字不足 2 个字符")
    )
)]
pub async fn search_winners_get(
    winner_service: web::Data<WinnerService>,
    query: web::Query<WinnerSearchQuery>,
) -> Result<HttpResponse> {
    run_search(&winner_service, &query).await
}

#[utoipa::path(
    post,
    path = "/public/search-winners",
    tag = "public",
    request_body = WinnerSearchQuery,
    responses(
        (status = 200, description = "已审核中奖者搜索结果", body = [PublicWinner]),
        (status = 400, description = "关键字不足 2 个字符")
    )
)]
pub async fn search_winners_post(
    winner_service: web::Data<WinnerService>,
    request: web::Json<WinnerSearchQuery>,
) -> Result<HttpResponse> {
    run_search(&winner_service, &request).await
}

#[utoipa::path(
    get,
    path = "/public/winner-list",
    tag = "public",
    responses((status = 200, description = "已审核 / 已付款中奖者", body = [PublicWinner]))
)]
pub async fn winner_list(winner_service: web::Data<WinnerService>) -> Result<HttpResponse> {
    match winner_service
        .list_by_status(&["Approved", "Paid"], WINNER_LIST_LIMIT)
        .await
    {
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

/// 搜索结果页：目前只支持按手机号，附带公司收款账户
#[utoipa::path(
    get,
    path = "/public/search-result",
    tag = "public",
    params(SearchResultQuery),
    responses((status = 200, description = "搜索结果与收款账户"))
)]
pub async fn search_result(
    winner_service: web::Data<WinnerService>,
    company_bank_service: web::Data<CompanyBankService>,
    query: web::Query<SearchResultQuery>,
) -> Result<HttpResponse> {
    let search_query = non_empty(&query.q).unwrap_or_default().to_string();
    let search_type = non_empty(&query.search_type).unwrap_or("phone").to_string();

    let company_bank = match company_bank_service.primary().await {
        Ok(bank) => bank.map(CompanyBankPublicView::from),
        Err(e) => return Ok(e.error_response()),
    };

    let mut winners: Vec<SearchResultWinner> = Vec::new();
    let mut message = None;
    if !search_query.is_empty() && search_type == "phone" {
        match winner_service
            .search_active_by_phone(&search_query, SEARCH_RESULT_LIMIT)
            .await
        {
            Ok(list) => winners = list.into_iter().map(Into::into).collect(),
            Err(e) => return Ok(e.error_response()),
        }
        if winners.is_empty() {
            message = Some(format!("No winners found for phone number: {search_query}"));
        }
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "winners": winners,
            "searchQuery": search_query,
            "searchType": search_type,
            "companyBankDetails": company_bank
        },
        "message": message
    })))
}

#[utoipa::path(
    get,
    path = "/public/prizes",
    tag = "public",
    responses((status = 200, description = "有效奖品", body = [PrizeResponse]))
)]
pub async fn prizes(prize_service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match prize_service.list_active(HOME_PRIZES).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn public_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/public")
            .route("/home", web::get().to(home))
            .route("/search", web::post().to(search_by_phone))
            .route("/status", web::post().to(status))
            .route("/check-status", web::post().to(check_status))
            .route("/winner-details/{wcode}", web::get().to(winner_details))
            .route("/search-winners", web::get().to(search_winners_get))
            .route("/search-winners", web::post().to(search_winners_post))
            .route("/winner-list", web::get().to(winner_list))
            .route("/search-result", web::get().to(search_result))
            .route("/prizes", web::get().to(prizes)),
    );
}
