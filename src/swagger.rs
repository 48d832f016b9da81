use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    AccountType, BankDetailStatus, BankPurpose, Medal, PaymentMethod, PrizeType,
    VerificationStatus,
};
use crate::handlers;
use crate::import::{AdminNotices, ApiImportSummary, ImportOutcome};
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::dashboard,
        handlers::admin::list_winners,
        handlers::admin::create_winner,
        handlers::admin::update_winner,
        handlers::admin::delete_winner,
        handlers::admin::upload_winners,
        handlers::admin::download_template,
        handlers::admin::get_settings,
        handlers::admin::update_settings,
        handlers::admin::list_bank_details,
        handlers::admin::upsert_bank_detail,
        handlers::admin::list_company_banks,
        handlers::admin::create_company_bank,
        handlers::admin::delete_company_bank,
        handlers::admin::list_prizes,
        handlers::admin::create_prize,
        handlers::admin::update_prize,
        handlers::admin::delete_prize,
        handlers::api::list_winners,
        handlers::api::public_winners,
        handlers::api::upload_winners,
        handlers::api::update_winner,
        handlers::api::delete_winner,
        handlers::api::stats,
        handlers::public::home,
        handlers::public::search_by_phone,
        handlers::public::status,
        handlers::public::check_status,
        handlers::public::winner_details,
        handlers::public::search_winners_get,
        handlers::public::search_winners_post,
        handlers::public::winner_list,
        handlers::public::search_result,
        handlers::public::prizes,
    ),
    components(
        schemas(
            AdminLoginRequest,
            AdminLoginResponse,
            AdminResponse,
            UpdateSettingsRequest,
            WinnerResponse,
            PublicWinner,
            WinnerStatusView,
            WinnerDetailView,
            SearchResultWinner,
            CreateWinnerRequest,
            UpdateWinnerRequest,
            WinnerStats,
            PhoneSearchRequest,
            StatusCheckRequest,
            SearchType,
            WinnerSearchQuery,
            ImportOutcome,
            ApiImportSummary,
            AdminNotices,
            BankDetailResponse,
            UpsertBankDetailRequest,
            CompanyBankResponse,
            CompanyBankPublicView,
            CreateCompanyBankRequest,
            PrizeResponse,
            PrizeType,
            BankDetailStatus,
            VerificationStatus,
            PaymentMethod,
            AccountType,
            BankPurpose,
            Medal,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "admin", description = "Admin back office API"),
        (name = "winners", description = "Winner JSON API"),
        (name = "public", description = "Public winner lookup API"),
    ),
    info(
        title = "Lucky Draw Backend API",
        version = "1.0.0",
        description = "Lucky draw winner lookup and administration REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_upload_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/winners/upload"));
        assert!(doc.paths.paths.contains_key("/admin/upload"));
        assert!(doc.paths.paths.contains_key("/public/search-winners"));
    }
}
