//! 常见问题

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    faqs::{
        entities::{Audience, FaqFilter, FaqUpdate, NewFaq},
        requests::{CreateFaqRequest, FaqListParams, UpdateFaqRequest},
    },
    users::entities::UserRole,
};
use crate::services::current_user;

super::declare_service!(FaqService);

fn faq_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::FaqNotFound, "FAQ not found"))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FaqService {
    /// 管理员看到全部 FAQ（含未发布），其他角色只看已发布且面向自己的条目
    pub async fn list(&self, query: FaqListParams, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let filter = FaqFilter {
            audiences: Audience::visible_to(&user.role),
            published_only: user.role != UserRole::Admin,
            category: trimmed(query.category),
            search: trimmed(query.search),
        };
        let faqs = storage.list_faqs(filter).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::list(faqs, "FAQs retrieved")))
    }

    pub async fn create(&self, body: CreateFaqRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let question = body.question.trim().to_string();
        let answer = body.answer.trim().to_string();
        if question.is_empty() || answer.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Question and answer are required",
            )));
        }

        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        let faq = storage
            .create_faq(NewFaq {
                question,
                answer,
                category: trimmed(body.category),
                audience: body.audience,
                is_published: body.is_published,
                sort_order: body.sort_order,
                created_by: user.id,
            })
            .await?;
        info!("FAQ {} created", faq.id);

        Ok(HttpResponse::Created().json(ApiResponse::success(faq, "FAQ created successfully")))
    }

    pub async fn get(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_faq_by_id(id).await? {
            Some(faq) => Ok(HttpResponse::Ok().json(ApiResponse::success(faq, "FAQ retrieved"))),
            None => Ok(faq_not_found()),
        }
    }

    pub async fn update(
        &self,
        id: i64,
        body: UpdateFaqRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let question = body.question.map(|q| q.trim().to_string());
        let answer = body.answer.map(|a| a.trim().to_string());
        if question.as_deref().is_some_and(str::is_empty) || answer.as_deref().is_some_and(str::is_empty) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Question and answer must not be empty",
            )));
        }

        let storage = self.get_storage(request)?;
        let update = FaqUpdate {
            question,
            answer,
            category: trimmed(body.category),
            audience: body.audience,
            is_published: body.is_published,
            sort_order: body.sort_order,
        };
        match storage.update_faq(id, update).await? {
            Some(faq) => {
                info!("FAQ {} updated", id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(faq, "FAQ updated successfully")))
            }
            None => Ok(faq_not_found()),
        }
    }

    pub async fn delete(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        if storage.delete_faq(id).await? {
            info!("FAQ {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("FAQ deleted successfully")))
        } else {
            Ok(faq_not_found())
        }
    }
}
