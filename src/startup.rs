use crate::auth_jwt::auth::JwtSecret;
use crate::db::PgPool;
use crate::routes::{
    health_check::health_check,
    order::order::{
        add_product_to_order, create_order, get_order_products, get_user_orders,
        remove_product_from_order,
    },
    product::product::{
        create_product, delete_product, get_product, get_products, get_products_paginated,
        update_product,
    },
    user::user::{
        create_user, delete_user, get_user, get_users, get_users_paginated, login_user,
        update_user,
    },
};
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

/**************************************************************/
// Application State to reuse the same code in main and tests
/***************************************************************/
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(port: u16, pool: PgPool, jwt_secret: String) -> Result<Self, std::io::Error> {
        let listener = if port == 0 {
            TcpListener::bind("127.0.0.1:0")?
        } else {
            let address = format!("127.0.0.1:{}", port);
            TcpListener::bind(&address)?
        };

        let actual_port = listener.local_addr()?.port();

        let server = run_server(listener, pool.clone(), jwt_secret)?;
        Ok(Self {
            port: actual_port,
            server,
        })
    }
    pub fn port(&self) -> u16 {
        self.port
    }
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/******************************************/
// Running Server
/******************************************/
pub fn run_server(
    listener: TcpListener,
    pool: PgPool,
    jwt_secret: String,
) -> Result<Server, std::io::Error> {
    let secret = JwtSecret(jwt_secret);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(secret.clone()))
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login_user))
            .route("/users", web::post().to(create_user))
            .route("/users", web::get().to(get_users))
            // The paginate route has to be registered before `/users/{id}` so
            // actix does not try to parse "paginate" as an id.
            .route("/users/paginate/{page}", web::get().to(get_users_paginated))
            .route("/users/{id}", web::get().to(get_user))
            .route("/users/{id}", web::put().to(update_user))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/products", web::get().to(get_products))
            .route("/products", web::post().to(create_product))
            .route(
                "/products/paginate/{page}",
                web::get().to(get_products_paginated),
            )
            .route("/products/{id}", web::get().to(get_product))
            .route("/products/{id}", web::put().to(update_product))
            .route("/products/{id}", web::delete().to(delete_product))
            .route("/orders", web::post().to(create_order))
            .route(
                "/orders/{order_id}/add_product/{product_id}",
                web::put().to(add_product_to_order),
            )
            .route(
                "/orders/{order_id}/remove_product/{product_id}",
                web::delete().to(remove_product_from_order),
            )
            .route("/orders/user/{user_id}", web::get().to(get_user_orders))
            .route(
                "/orders/{order_id}/products",
                web::get().to(get_order_products),
            )
    })
    .listen(listener)?
    .run();
    Ok(server)
}
