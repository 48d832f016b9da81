use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines

use lucky_draw_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 创建服务
    let admin_service = AdminService::new(pool.clone(), jwt_service.clone());
    admin_service
        .ensure_default_admin(&config.admin)
        .await
        .expect("Failed to create default admin");

    let winner_service = WinnerService::new(pool.clone());
    let import_service = ImportService::new(
        pool.clone(),
        config.import.clone(),
        config.uploads.clone(),
    );
    let bank_detail_service = BankDetailService::new(pool.clone());
    let company_bank_service = CompanyBankService::new(pool.clone());
    let prize_service = PrizeService::new(pool.clone(), &config.uploads);
    let import_config = config.import.clone();

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .app_data(web::Data::new(winner_service.clone()))
            .app_data(web::Data::new(import_service.clone()))
            .app_data(web::Data::new(bank_detail_service.clone()))
            .app_data(web::Data::new(company_bank_service.clone()))
            .app_data(web::Data::new(prize_service.clone()))
            .app_data(web::Data::new(import_config.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::admin_config)
                    .configure(handlers::public_config)
                    .configure(handlers::api_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
