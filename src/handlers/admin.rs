use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::config::ImportConfig;
use crate::import::{AdminNotices, TEMPLATE_FILE_NAME};
use crate::middlewares::current_admin;
use crate::models::*;
use crate::services::{
    AdminService, BankDetailService, CompanyBankService, ImportEntry, ImportService,
    PrizeService, WinnerService,
};
use crate::utils::{EXCEL_FIELD, IMAGE_FIELD, read_multipart};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AdminLoginResponse),
        (status = 401, description = "用户名或密码错误")
    )
)]
pub async fn login(
    admin_service: web::Data<AdminService>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse> {
    match admin_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "Login successful"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 令牌无状态，客户端丢弃即可
#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "已退出"))
)]
pub async fn logout(req: HttpRequest) -> Result<HttpResponse> {
    if let Ok(admin) = current_admin(&req) {
        log::info!("Admin '{}' logged out", admin.username);
    }
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Logged out successfully"
    })))
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "统计数据", body = WinnerStats),
        (status = 401, description = "未登录")
    )
)]
pub async fn dashboard(winner_service: web::Data<WinnerService>) -> Result<HttpResponse> {
    match winner_service.stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/winners",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(WinnerListQuery),
    responses((status = 200, description = "中奖者分页列表"))
)]
pub async fn list_winners(
    winner_service: web::Data<WinnerService>,
    import_config: web::Data<ImportConfig>,
    query: web::Query<WinnerListQuery>,
) -> Result<HttpResponse> {
    match winner_service
        .list(&query, import_config.admin_page_size)
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
    post,
    path = "/admin/winners",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateWinnerRequest,
    responses(
        (status = 200, description = "新增成功", body = WinnerResponse),
        (status = 400, description = "字段缺失"),
        (status = 409, description = "手机号 / W-Code / ID 已存在")
    )
)]
pub async fn create_winner(
    winner_service: web::Data<WinnerService>,
    import_config: web::Data<ImportConfig>,
    request: web::Json<CreateWinnerRequest>,
) -> Result<HttpResponse> {
    match winner_service
        .create(request.into_inner(), &import_config.admin_default_status)
        .await
    {
        Ok(winner) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": winner,
            "message": "Winner added successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/winners/{id}",
    tag = "admin",
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
            "data": winner,
            "message": "Winner updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/winners/{id}",
    tag = "admin",
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

/// 后台批量导入：返回汇总与页面提示
#[utoipa::path(
    post,
    path = "/admin/upload",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "excelFile: .xlsx / .xls"),
    responses(
        (status = 200, description = "导入完成（可能含失败行）", body = ImportOutcome),
        (status = 400, description = "未选择文件 / 文件为空 / 无法解析")
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
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": {
                "code": "VALIDATION_ERROR",
                "message": "Please select an Excel file to upload"
            }
        })));
    };

    let max_listed = import_service.import_config().max_listed_errors;
    match import_service.import_upload(&file, ImportEntry::Admin).await {
        Ok(Ok(outcome)) => {
            let notices = outcome.admin_notices(max_listed);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": outcome,
                "notices": notices
            })))
        }
        Ok(Err(import_error)) => {
            let notices = AdminNotices {
                success: Vec::new(),
                error: vec![import_error.to_string()],
            };
            Ok(HttpResponse::BadRequest().json(json!({
                "success": false,
                "error": {
                    "code": "IMPORT_FAILED",
                    "message": import_error.to_string()
                },
                "notices": notices
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/download-template",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "winners_template.xlsx 模板文件"))
)]
pub async fn download_template(import_service: web::Data<ImportService>) -> Result<HttpResponse> {
    match import_service.template() {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(TEMPLATE_FILE_NAME.to_string())],
            })
            .body(bytes)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "当前管理员信息", body = AdminResponse))
)]
pub async fn get_settings(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let admin = match current_admin(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };
    match admin_service.get_settings(admin.id).await {
        Ok(settings) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": settings
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/settings",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "已更新", body = AdminResponse),
        (status = 400, description = "当前密码错误或新密码不符合要求")
    )
)]
pub async fn update_settings(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse> {
    let admin = match current_admin(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };
    match admin_service
        .update_settings(admin.id, request.into_inner())
        .await
    {
        Ok(settings) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": settings,
            "message": "Settings updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/bank-details",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(BankDetailListQuery),
    responses((status = 200, description = "中奖者银行信息分页列表"))
)]
pub async fn list_bank_details(
    bank_detail_service: web::Data<BankDetailService>,
    query: web::Query<BankDetailListQuery>,
) -> Result<HttpResponse> {
    match bank_detail_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/bank-update",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = UpsertBankDetailRequest,
    responses(
        (status = 200, description = "已保存", body = BankDetailResponse),
        (status = 404, description = "该手机号没有中奖记录")
    )
)]
pub async fn upsert_bank_detail(
    bank_detail_service: web::Data<BankDetailService>,
    req: HttpRequest,
    request: web::Json<UpsertBankDetailRequest>,
) -> Result<HttpResponse> {
    let admin = match current_admin(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };
    match bank_detail_service
        .upsert_by_phone(request.into_inner(), &admin.username)
        .await
    {
        Ok((detail, created)) => {
            let message = if created {
                "Bank details added successfully"
            } else {
                "Bank details updated successfully"
            };
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": detail,
                "message": message
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/company-bank",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "公司收款账户", body = [CompanyBankResponse]))
)]
pub async fn list_company_banks(
    company_bank_service: web::Data<CompanyBankService>,
) -> Result<HttpResponse> {
    match company_bank_service.list_active().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/company-bank",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateCompanyBankRequest,
    responses(
        (status = 200, description = "已新增", body = CompanyBankResponse),
        (status = 400, description = "必填字段缺失")
    )
)]
pub async fn create_company_bank(
    company_bank_service: web::Data<CompanyBankService>,
    req: HttpRequest,
    request: web::Json<CreateCompanyBankRequest>,
) -> Result<HttpResponse> {
    let admin = match current_admin(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };
    match company_bank_service
        .create(request.into_inner(), &admin.username)
        .await
    {
        Ok(bank) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": bank,
            "message": "Company bank details added successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/company-bank/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "账户主键")),
    responses(
        (status = 200, description = "已删除"),
        (status = 404, description = "不存在")
    )
)]
pub async fn delete_company_bank(
    company_bank_service: web::Data<CompanyBankService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let admin = match current_admin(&req) {
        Ok(admin) => admin,
        Err(e) => return Ok(e.error_response()),
    };
    match company_bank_service
        .soft_delete(path.into_inner(), &admin.username)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Company bank details deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/prizes",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "全部奖品（按 position）", body = [PrizeResponse]))
)]
pub async fn list_prizes(prize_service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match prize_service.list_all().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/prizes",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "title, description, amount, position, emoji, medal, image"),
    responses(
        (status = 200, description = "已新增", body = PrizeResponse),
        (status = 400, description = "缺少图片或字段"),
        (status = 409, description = "position 已被占用")
    )
)]
pub async fn create_prize(
    prize_service: web::Data<PrizeService>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = match read_multipart(payload, prize_service.max_image_bytes()).await {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };
    let image = form.take_file(IMAGE_FIELD);

    match prize_service
        .create(PrizeForm::from_multipart(&form), image)
        .await
    {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": prize,
            "message": "Prize added successfully!"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/prizes/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "奖品主键")),
    request_body(content = String, content_type = "multipart/form-data", description = "image 可选，不传则保留原图"),
    responses(
        (status = 200, description = "已更新", body = PrizeResponse),
        (status = 404, description = "不存在")
    )
)]
pub async fn update_prize(
    prize_service: web::Data<PrizeService>,
    path: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = match read_multipart(payload, prize_service.max_image_bytes()).await {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };
    let image = form.take_file(IMAGE_FIELD);

    match prize_service
        .update(path.into_inner(), PrizeForm::from_multipart(&form), image)
        .await
    {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": prize,
            "message": "Prize updated successfully!"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/prizes/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "奖品主键")),
    responses(
        (status = 200, description = "已删除"),
        (status = 404, description = "不存在")
    )
)]
pub async fn delete_prize(
    prize_service: web::Data<PrizeService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match prize_service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Prize deleted successfully!"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/dashboard", web::get().to(dashboard))
            .route("/winners", web::get().to(list_winners))
            .route("/winners", web::post().to(create_winner))
            .route("/winners/{id}", web::put().to(update_winner))
            .route("/winners/{id}", web::delete().to(delete_winner))
            .route("/upload", web::post().to(upload_winners))
            .route("/download-template", web::get().to(download_template))
            .route("/settings", web::get().to(get_settings))
            .route("/settings", web::post().to(update_settings))
            .route("/bank-details", web::get().to(list_bank_details))
            .route("/bank-update", web::post().to(upsert_bank_detail))
            .route("/company-bank", web::get().to(list_company_banks))
            .route("/company-bank", web::post().to(create_company_bank))
            .route("/company-bank/{id}", web::delete().to(delete_company_bank))
            .route("/prizes", web::get().to(list_prizes))
            .route("/prizes", web::post().to(create_prize))
            .route("/prizes/{id}", web::post().to(update_prize))
            .route("/prizes/{id}", web::delete().to(delete_prize)),
    );
}
